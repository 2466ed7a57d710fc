//! backend/src/io/rest/mappers/forecast_mapper.rs

use shared::{ForecastThresholds, HerdForecastResponse, MonthForecast, WeekForecast};

use crate::domain::forecast::{month_label, week_label, ForecastSettings, HerdForecast};
use crate::io::rest::mappers::animal_mapper::DATE_FORMAT;

pub struct ForecastMapper;

impl ForecastMapper {
    pub fn to_dto(forecast: HerdForecast, settings: &ForecastSettings) -> HerdForecastResponse {
        HerdForecastResponse {
            generated_for: forecast.generated_for.format(DATE_FORMAT).to_string(),
            active_animals: forecast.active_animals,
            average_milking: forecast.average_milking,
            max_milking: forecast.max_milking,
            thresholds: ForecastThresholds { ideal: settings.ideal, min: settings.min, max: settings.max },
            months: forecast
                .months
                .into_iter()
                .map(|month| MonthForecast {
                    label: month_label(month.start),
                    start_date: month.start.format(DATE_FORMAT).to_string(),
                    milking: month.milking,
                    level: month.level,
                    weeks: month
                        .weeks
                        .into_iter()
                        .map(|week| WeekForecast {
                            label: week_label(week.start),
                            start_date: week.start.format(DATE_FORMAT).to_string(),
                            milking: week.milking,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
