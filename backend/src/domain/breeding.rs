//! Breeding-cycle milestone projection.
//!
//! Pure date arithmetic over the events recorded on an animal. "Today" is
//! always an argument; nothing here reads the wall clock. Every day count is
//! a whole calendar-day difference between two `NaiveDate`s.
//!
//! The offsets are collected in [`BreedingConstants`]. Herds have used
//! different values over time (dry-off 220 vs. 230 days, calving 280 vs. 290
//! days), so they are configurable; the defaults are the canonical set.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::PregnancyCheck;

use crate::domain::models::Animal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreedingConstants {
    /// Length of the heat (estrus) cycle
    pub heat_cycle_days: i64,
    /// How long after a projected heat the animal is still shown as expected
    pub heat_overdue_days: i64,
    /// How far ahead of a projected heat the animal is shown as expected
    pub heat_lookahead_days: i64,
    /// Pregnancy check is due this many days after insemination
    pub pregnancy_check_days: i64,
    /// Day after insemination from which a returning heat is watched for
    pub reinsemination_watch_days: i64,
    /// Dry-off is due this many days after insemination
    pub dry_off_days: i64,
    /// Calving is due this many days after insemination
    pub calving_days: i64,
    /// Age at which a heifer is expected to start cycling
    pub heifer_cycling_age_months: i32,
    /// Days after calving before a cow goes back to heat observation
    pub post_calving_wait_days: i64,
    /// How long a calving counts as recent
    pub recently_calved_days: i64,
}

impl Default for BreedingConstants {
    fn default() -> Self {
        Self {
            heat_cycle_days: 21,
            heat_overdue_days: 2,
            heat_lookahead_days: 5,
            pregnancy_check_days: 45,
            reinsemination_watch_days: 19,
            dry_off_days: 220,
            calving_days: 280,
            heifer_cycling_age_months: 14,
            post_calving_wait_days: 19,
            recently_calved_days: 60,
        }
    }
}

/// Every projection that applies to one animal on a given day
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Milestones {
    pub next_heat: Option<NaiveDate>,
    pub pregnancy_check_due: Option<NaiveDate>,
    pub reinsemination_watch: Option<NaiveDate>,
    pub dry_off_due: Option<NaiveDate>,
    pub calving_due: Option<NaiveDate>,
    pub age_months: Option<i32>,
    pub days_since_calving: Option<i64>,
}

impl BreedingConstants {
    /// Next projected heat counted from `origin` in whole cycles.
    ///
    /// At least one cycle is added, then as many more as needed so the result
    /// is never before `today`.
    pub fn next_heat_date(&self, origin: NaiveDate, today: NaiveDate) -> NaiveDate {
        let cycle = self.heat_cycle_days.max(1);
        let first = add_days(origin, cycle);
        if first >= today {
            return first;
        }
        let behind = (today - first).num_days();
        let cycles = (behind + cycle - 1) / cycle;
        add_days(first, cycles * cycle)
    }

    /// Whether a heat counted from `origin` is expected within the tolerant
    /// window around today: up to `heat_lookahead_days` ahead, or up to
    /// `heat_overdue_days` ago for a projected (not observed) heat.
    pub fn heat_window_contains(&self, origin: NaiveDate, today: NaiveDate) -> bool {
        let next = self.next_heat_date(origin, today);
        if days_until(next, today) <= self.heat_lookahead_days {
            return true;
        }
        let previous = add_days(next, -self.heat_cycle_days.max(1));
        previous > origin && days_since(previous, today) <= self.heat_overdue_days
    }

    pub fn dry_off_due_date(&self, insemination: NaiveDate) -> NaiveDate {
        add_days(insemination, self.dry_off_days)
    }

    /// `None` exactly when there is no insemination on record
    pub fn calving_due_date(&self, insemination: Option<NaiveDate>) -> Option<NaiveDate> {
        insemination.map(|date| add_days(date, self.calving_days))
    }

    pub fn pregnancy_check_due_date(&self, insemination: NaiveDate) -> NaiveDate {
        add_days(insemination, self.pregnancy_check_days)
    }

    pub fn reinsemination_watch_date(&self, insemination: NaiveDate) -> NaiveDate {
        add_days(insemination, self.reinsemination_watch_days)
    }

    pub fn milestones(&self, animal: &Animal, today: NaiveDate) -> Milestones {
        let pregnant = animal.is_pregnant();
        let insemination = animal.insemination_date;

        Milestones {
            next_heat: if pregnant {
                None
            } else {
                heat_origin(animal).map(|origin| self.next_heat_date(origin, today))
            },
            pregnancy_check_due: insemination
                .filter(|_| {
                    matches!(animal.pregnancy_check, PregnancyCheck::Unset | PregnancyCheck::Uncertain)
                })
                .map(|date| self.pregnancy_check_due_date(date)),
            reinsemination_watch: insemination
                .filter(|_| !pregnant)
                .map(|date| self.reinsemination_watch_date(date)),
            dry_off_due: insemination
                .filter(|_| pregnant && animal.is_cow() && animal.dry_off_date.is_none())
                .map(|date| self.dry_off_due_date(date)),
            calving_due: if pregnant { self.calving_due_date(insemination) } else { None },
            age_months: animal.birth_date.map(|birth| age_in_months(birth, today)),
            days_since_calving: animal.calving_date.map(|calved| days_since(calved, today)),
        }
    }
}

/// The day the current heat cycle is counted from: the later of the last
/// observed heat and the last calving.
pub fn heat_origin(animal: &Animal) -> Option<NaiveDate> {
    match (animal.last_heat, animal.calving_date) {
        (Some(heat), Some(calving)) => Some(heat.max(calving)),
        (heat, calving) => heat.or(calving),
    }
}

/// Signed day count from `today` to `date` (negative when overdue)
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// Days elapsed since `date`, never negative
pub fn days_since(date: NaiveDate, today: NaiveDate) -> i64 {
    (today - date).num_days().max(0)
}

/// Calendar-month difference, ignoring the day of month
pub fn age_in_months(birth: NaiveDate, today: NaiveDate) -> i32 {
    (today.year() * 12 + today.month() as i32) - (birth.year() * 12 + birth.month() as i32)
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or(if days >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}
