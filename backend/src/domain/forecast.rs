//! Herd occupancy forecast.
//!
//! Projects how many animals will be milking at the start of each week over
//! the coming months, from the recorded insemination, dry-off and calving
//! dates. Months are 30-day steps from today, weeks 7-day steps within them.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use shared::{ForecastLevel, PregnancyCheck};

use crate::domain::breeding::{add_days, BreedingConstants};
use crate::domain::clock::Clock;
use crate::domain::models::Animal;
use crate::storage::AnimalStorage;

const MONTH_STEP_DAYS: i64 = 30;
const WEEK_STEP_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    pub months: u32,
    pub weeks_per_month: u32,
    /// Target number of milking cows
    pub ideal: u32,
    pub min: u32,
    pub max: u32,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self { months: 4, weeks_per_month: 4, ideal: 60, min: 50, max: 70 }
    }
}

impl ForecastSettings {
    pub fn rate(&self, milking: u32) -> ForecastLevel {
        if milking < self.min {
            ForecastLevel::BelowMin
        } else if milking > self.max {
            ForecastLevel::AboveMax
        } else {
            ForecastLevel::Ok
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekProjection {
    pub start: NaiveDate,
    pub milking: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthProjection {
    pub start: NaiveDate,
    /// Rounded mean of the weekly counts
    pub milking: u32,
    pub level: ForecastLevel,
    pub weeks: Vec<WeekProjection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HerdForecast {
    pub generated_for: NaiveDate,
    pub active_animals: usize,
    pub average_milking: u32,
    /// Highest count over the months and their weeks
    pub max_milking: u32,
    pub months: Vec<MonthProjection>,
}

/// Whether `animal` is expected to be giving milk on `day`
pub fn is_milking_on(animal: &Animal, day: NaiveDate, constants: &BreedingConstants) -> bool {
    let insemination = animal
        .insemination_date
        .filter(|_| animal.pregnancy_check != PregnancyCheck::Negative);

    match (animal.is_cow(), insemination) {
        (true, Some(inseminated)) => {
            let dry_from = animal
                .dry_off_date
                .unwrap_or_else(|| constants.dry_off_due_date(inseminated));
            let calving = add_days(inseminated, constants.calving_days);
            !(dry_from <= day && day <= calving)
        }
        (true, None) => animal.dry_off_date.is_none(),
        // A heifer starts milking with her first calving
        (false, Some(inseminated)) => add_days(inseminated, constants.calving_days) <= day,
        (false, None) => false,
    }
}

/// Project the milking count over the configured horizon for the given
/// (active) animals
pub fn project(
    animals: &[Animal],
    today: NaiveDate,
    settings: &ForecastSettings,
    constants: &BreedingConstants,
) -> HerdForecast {
    let months: Vec<MonthProjection> = (0..settings.months)
        .map(|month| {
            let start = add_days(today, i64::from(month) * MONTH_STEP_DAYS);
            let weeks: Vec<WeekProjection> = (0..settings.weeks_per_month)
                .map(|week| {
                    let week_start = add_days(start, i64::from(week) * WEEK_STEP_DAYS);
                    let milking = animals
                        .iter()
                        .filter(|animal| is_milking_on(animal, week_start, constants))
                        .count();
                    WeekProjection { start: week_start, milking: milking as u32 }
                })
                .collect();
            let milking = rounded_mean(weeks.iter().map(|week| week.milking));
            MonthProjection { start, milking, level: settings.rate(milking), weeks }
        })
        .collect();

    HerdForecast {
        generated_for: today,
        active_animals: animals.len(),
        average_milking: rounded_mean(months.iter().map(|month| month.milking)),
        max_milking: months
            .iter()
            .flat_map(|month| std::iter::once(month.milking).chain(month.weeks.iter().map(|week| week.milking)))
            .max()
            .unwrap_or(0),
        months,
    }
}

fn rounded_mean(values: impl Iterator<Item = u32>) -> u32 {
    let (sum, count) = values.fold((0u64, 0u64), |(sum, count), value| (sum + u64::from(value), count + 1));
    if count == 0 {
        return 0;
    }
    ((sum * 2 + count) / (count * 2)) as u32
}

/// ISO week label shown for a week start
pub fn week_label(start: NaiveDate) -> String {
    format!("Week {}", start.iso_week().week())
}

pub fn month_label(start: NaiveDate) -> String {
    start.format("%B %Y").to_string()
}

#[derive(Clone)]
pub struct ForecastService {
    storage: Arc<dyn AnimalStorage>,
    clock: Arc<dyn Clock>,
    constants: BreedingConstants,
    settings: ForecastSettings,
}

impl ForecastService {
    pub fn new(
        storage: Arc<dyn AnimalStorage>,
        clock: Arc<dyn Clock>,
        constants: BreedingConstants,
        settings: ForecastSettings,
    ) -> Self {
        Self { storage, clock, constants, settings }
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    pub async fn forecast(&self) -> Result<HerdForecast> {
        let today = self.clock.today();
        let animals = self.storage.list_animals(true).await?;

        let forecast = project(&animals, today, &self.settings, &self.constants);

        info!(
            "Forecast for {}: {} active animals, average {} milking, peak {}",
            today, forecast.active_animals, forecast.average_milking, forecast.max_milking
        );
        Ok(forecast)
    }
}
