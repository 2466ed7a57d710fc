//! Builds the kiosk dashboard: every queue with its ordered members and
//! their projected milestones for today.

use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

use shared::QueueKind;

use crate::domain::breeding::{BreedingConstants, Milestones};
use crate::domain::clock::Clock;
use crate::domain::errors::AnimalError;
use crate::domain::models::Animal;
use crate::domain::queues;
use crate::storage::AnimalStorage;

#[derive(Debug, Clone, PartialEq)]
pub struct QueueMember {
    pub animal: Animal,
    pub milestones: Milestones,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueueSnapshot {
    pub queue: QueueKind,
    pub date: NaiveDate,
    pub members: Vec<QueueMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub date: NaiveDate,
    pub active_animals: usize,
    pub queues: Vec<QueueSnapshot>,
}

#[derive(Clone)]
pub struct DashboardService {
    storage: Arc<dyn AnimalStorage>,
    clock: Arc<dyn Clock>,
    constants: BreedingConstants,
}

impl DashboardService {
    pub fn new(storage: Arc<dyn AnimalStorage>, clock: Arc<dyn Clock>, constants: BreedingConstants) -> Self {
        Self { storage, clock, constants }
    }

    /// All queues in dashboard order
    pub async fn dashboard(&self) -> Result<DashboardSnapshot> {
        let today = self.clock.today();
        let animals = self.storage.list_animals(true).await?;

        let queues: Vec<QueueSnapshot> = QueueKind::ALL
            .iter()
            .map(|queue| self.snapshot(*queue, &animals, today))
            .collect();

        info!(
            "Built dashboard for {}: {} active animals, {} queue entries",
            today,
            animals.len(),
            queues.iter().map(|q| q.members.len()).sum::<usize>()
        );

        Ok(DashboardSnapshot { date: today, active_animals: animals.len(), queues })
    }

    pub async fn queue(&self, queue: QueueKind) -> Result<QueueSnapshot> {
        let today = self.clock.today();
        let animals = self.storage.list_animals(true).await?;

        let snapshot = self.snapshot(queue, &animals, today);
        info!("Queue {} has {} animals on {}", queue, snapshot.members.len(), today);
        Ok(snapshot)
    }

    /// Projected milestones of a single animal for today
    pub async fn milestones(&self, id: i64) -> Result<(NaiveDate, Animal, Milestones)> {
        let today = self.clock.today();
        let animal = match self.storage.get_animal(id).await? {
            Some(animal) => animal,
            None => {
                warn!("Animal not found: {}", id);
                return Err(AnimalError::NotFound(id).into());
            }
        };

        let milestones = self.constants.milestones(&animal, today);
        Ok((today, animal, milestones))
    }

    fn snapshot(&self, queue: QueueKind, animals: &[Animal], today: NaiveDate) -> QueueSnapshot {
        let members = queues::build_queue(queue, animals, today, &self.constants)
            .into_iter()
            .map(|animal| QueueMember {
                milestones: self.constants.milestones(&animal, today),
                animal,
            })
            .collect();
        QueueSnapshot { queue, date: today, members }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::animal_service::AnimalService;
    use crate::domain::clock::FixedClock;
    use crate::domain::commands::animals::{BreedingCommand, CreateAnimalCommand};
    use crate::storage::{AnimalRepository, DbConnection};
    use shared::{ExitReason, PregnancyCheck};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup_test() -> (AnimalService, DashboardService, FixedClock) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let storage: Arc<dyn AnimalStorage> = Arc::new(AnimalRepository::new(db));
        let clock = FixedClock::on(date(2026, 6, 15));
        let animals = AnimalService::new(storage.clone(), Arc::new(clock.clone()));
        let dashboard = DashboardService::new(storage, Arc::new(clock.clone()), BreedingConstants::default());
        (animals, dashboard, clock)
    }

    fn command(name: &str, tag: &str, birth: NaiveDate, calving: Option<NaiveDate>) -> CreateAnimalCommand {
        CreateAnimalCommand {
            name: name.to_string(),
            tag_number: tag.to_string(),
            birth_date: Some(birth),
            calving_date: calving,
            insemination_date: None,
            pregnant: false,
            notes: None,
        }
    }

    fn names(snapshot: &QueueSnapshot) -> Vec<&str> {
        snapshot.members.iter().map(|m| m.animal.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_dashboard_lists_every_queue_in_order() {
        let (_, dashboard, _) = setup_test().await;

        let snapshot = dashboard.dashboard().await.unwrap();

        let kinds: Vec<_> = snapshot.queues.iter().map(|q| q.queue).collect();
        assert_eq!(kinds, QueueKind::ALL.to_vec());
        assert_eq!(snapshot.active_animals, 0);
        assert_eq!(snapshot.date, date(2026, 6, 15));
    }

    #[tokio::test]
    async fn test_heat_observation_queue_from_stored_animals() {
        let (animals, dashboard, _) = setup_test().await;
        animals.create_animal(command("Cow A", "1", date(2020, 3, 1), Some(date(2026, 4, 1)))).await.unwrap();
        animals.create_animal(command("Heifer B", "2", date(2025, 1, 5), None)).await.unwrap();
        animals.create_animal(command("Calf C", "3", date(2026, 1, 5), None)).await.unwrap();

        let queue = dashboard.queue(QueueKind::HeatObservation).await.unwrap();

        assert_eq!(names(&queue), vec!["Heifer B", "Cow A"]);
    }

    #[tokio::test]
    async fn test_inactive_animals_are_not_classified() {
        let (animals, dashboard, _) = setup_test().await;
        let cow = animals
            .create_animal(command("Gone", "1", date(2020, 3, 1), Some(date(2026, 4, 1))))
            .await
            .unwrap();
        animals.apply_command(cow.id, BreedingCommand::ToggleHoofCare).await.unwrap();
        animals
            .apply_command(cow.id, BreedingCommand::RecordExit { date: date(2026, 6, 1), reason: ExitReason::Sold })
            .await
            .unwrap();

        let snapshot = dashboard.dashboard().await.unwrap();

        assert_eq!(snapshot.active_animals, 0);
        assert!(snapshot.queues.iter().all(|q| q.members.is_empty()));
    }

    #[tokio::test]
    async fn test_queue_membership_follows_the_clock() {
        let (animals, dashboard, clock) = setup_test().await;
        let cow = animals
            .create_animal(command("Frida", "1", date(2020, 3, 1), Some(date(2025, 10, 1))))
            .await
            .unwrap();
        animals
            .apply_command(cow.id, BreedingCommand::RecordInsemination { date: date(2026, 5, 10) })
            .await
            .unwrap();

        let queue = dashboard.queue(QueueKind::PregnancyCheck).await.unwrap();
        assert!(queue.members.is_empty());

        clock.advance(chrono::Duration::days(10));
        let queue = dashboard.queue(QueueKind::PregnancyCheck).await.unwrap();
        assert_eq!(names(&queue), vec!["Frida"]);
        assert_eq!(queue.members[0].milestones.pregnancy_check_due, Some(date(2026, 6, 24)));
    }

    #[tokio::test]
    async fn test_milestones_for_pregnant_cow() {
        let (animals, dashboard, _) = setup_test().await;
        let cow = animals
            .create_animal(command("Gisela", "1", date(2020, 3, 1), Some(date(2025, 9, 1))))
            .await
            .unwrap();
        animals
            .apply_command(cow.id, BreedingCommand::RecordInsemination { date: date(2026, 1, 10) })
            .await
            .unwrap();
        animals
            .apply_command(cow.id, BreedingCommand::RecordPregnancyCheck { outcome: PregnancyCheck::Positive })
            .await
            .unwrap();

        let (today, animal, milestones) = dashboard.milestones(cow.id).await.unwrap();

        assert_eq!(today, date(2026, 6, 15));
        assert_eq!(animal.id, cow.id);
        assert_eq!(milestones.calving_due, Some(date(2026, 10, 17)));
        assert_eq!(milestones.dry_off_due, Some(date(2026, 8, 18)));
        assert_eq!(milestones.next_heat, None);
    }

    #[tokio::test]
    async fn test_milestones_for_missing_animal() {
        let (_, dashboard, _) = setup_test().await;

        let err = dashboard.milestones(9).await.unwrap_err();

        assert!(matches!(err.downcast_ref::<AnimalError>(), Some(AnimalError::NotFound(9))));
    }
}
