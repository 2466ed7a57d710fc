//! backend/src/io/rest/mappers/dashboard_mapper.rs

use chrono::NaiveDate;

use shared::{DashboardResponse, Milestones as SharedMilestones, MilestonesResponse, QueueEntry, QueueView};

use crate::domain::breeding::{days_until, Milestones};
use crate::domain::dashboard_service::{DashboardSnapshot, QueueSnapshot};
use crate::domain::models::Animal;
use crate::io::rest::mappers::animal_mapper::{format_date, AnimalMapper, DATE_FORMAT};

/// Mapper from dashboard snapshots to the shared DTOs
pub struct DashboardMapper;

impl DashboardMapper {
    pub fn to_milestones_dto(milestones: Milestones, today: NaiveDate) -> SharedMilestones {
        let until = |date: Option<NaiveDate>| date.map(|date| days_until(date, today));

        SharedMilestones {
            next_heat: format_date(milestones.next_heat),
            days_until_next_heat: until(milestones.next_heat),
            pregnancy_check_due: format_date(milestones.pregnancy_check_due),
            days_until_pregnancy_check: until(milestones.pregnancy_check_due),
            reinsemination_watch: format_date(milestones.reinsemination_watch),
            dry_off_due: format_date(milestones.dry_off_due),
            days_until_dry_off: until(milestones.dry_off_due),
            calving_due: format_date(milestones.calving_due),
            days_until_calving: until(milestones.calving_due),
            age_months: milestones.age_months,
            days_since_calving: milestones.days_since_calving,
        }
    }

    pub fn to_milestones_response(today: NaiveDate, animal: Animal, milestones: Milestones) -> MilestonesResponse {
        MilestonesResponse {
            animal_id: animal.id,
            date: today.format(DATE_FORMAT).to_string(),
            milestones: Self::to_milestones_dto(milestones, today),
        }
    }

    pub fn to_queue_view(snapshot: QueueSnapshot) -> QueueView {
        let today = snapshot.date;
        let entries: Vec<QueueEntry> = snapshot
            .members
            .into_iter()
            .map(|member| QueueEntry {
                animal: AnimalMapper::to_dto(member.animal),
                milestones: Self::to_milestones_dto(member.milestones, today),
            })
            .collect();

        QueueView {
            queue: snapshot.queue,
            title: snapshot.queue.title().to_string(),
            count: entries.len(),
            entries,
        }
    }

    pub fn to_dashboard_dto(snapshot: DashboardSnapshot) -> DashboardResponse {
        DashboardResponse {
            date: snapshot.date.format(DATE_FORMAT).to_string(),
            active_animals: snapshot.active_animals,
            queues: snapshot
                .queues
                .into_iter()
                .map(Self::to_queue_view)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milestones_carry_signed_day_counts() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        let milestones = Milestones {
            pregnancy_check_due: NaiveDate::from_ymd_opt(2026, 6, 12),
            calving_due: NaiveDate::from_ymd_opt(2026, 6, 20),
            ..Default::default()
        };

        let dto = DashboardMapper::to_milestones_dto(milestones, today);

        assert_eq!(dto.pregnancy_check_due.as_deref(), Some("2026-06-12"));
        assert_eq!(dto.days_until_pregnancy_check, Some(-3));
        assert_eq!(dto.days_until_calving, Some(5));
        assert_eq!(dto.next_heat, None);
        assert_eq!(dto.days_until_next_heat, None);
    }
}
