//! backend/src/io/rest/mappers/animal_mapper.rs

use chrono::NaiveDate;

use shared::{
    Animal as SharedAnimal, AnimalEventRequest, AnimalListResponse, AnimalResponse, CreateAnimalRequest,
    UpdateAnimalRequest,
};

use crate::domain::commands::animals::{BreedingCommand, CreateAnimalCommand, UpdateAnimalDetailsCommand};
use crate::domain::models::{Animal as DomainAnimal, AnimalValidationError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Mapper between the shared animal DTOs and the domain model / commands
pub struct AnimalMapper;

impl AnimalMapper {
    pub fn to_dto(domain: DomainAnimal) -> SharedAnimal {
        SharedAnimal {
            id: domain.id,
            name: domain.name,
            tag_number: domain.tag_number,
            birth_date: format_date(domain.birth_date),
            last_heat: format_date(domain.last_heat),
            insemination_date: format_date(domain.insemination_date),
            insemination_attempts: domain.insemination_attempts,
            pregnancy_check: domain.pregnancy_check,
            dry_off_date: format_date(domain.dry_off_date),
            calving_date: format_date(domain.calving_date),
            hoof_care_needed: domain.hoof_care_needed,
            sorted_out: domain.sorted_out,
            active: domain.active,
            exit_date: format_date(domain.exit.map(|exit| exit.date)),
            exit_reason: domain.exit.map(|exit| exit.reason),
            notes: domain.notes,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_response(domain: DomainAnimal, success_message: impl Into<String>) -> AnimalResponse {
        AnimalResponse { animal: Self::to_dto(domain), success_message: success_message.into() }
    }

    pub fn to_list_dto(animals: Vec<DomainAnimal>) -> AnimalListResponse {
        AnimalListResponse { animals: animals.into_iter().map(Self::to_dto).collect() }
    }

    pub fn to_create_command(request: CreateAnimalRequest) -> Result<CreateAnimalCommand, AnimalValidationError> {
        Ok(CreateAnimalCommand {
            birth_date: parse_optional_date("birth", request.birth_date.as_deref())?,
            calving_date: parse_optional_date("calving", request.calving_date.as_deref())?,
            insemination_date: parse_optional_date("insemination", request.insemination_date.as_deref())?,
            name: request.name,
            tag_number: request.tag_number,
            pregnant: request.pregnant,
            notes: request.notes,
        })
    }

    pub fn to_update_command(request: UpdateAnimalRequest) -> Result<UpdateAnimalDetailsCommand, AnimalValidationError> {
        Ok(UpdateAnimalDetailsCommand {
            birth_date: request
                .birth_date
                .as_deref()
                .map(|text| parse_optional_date("birth", Some(text)))
                .transpose()?,
            name: request.name,
            tag_number: request.tag_number,
            notes: request.notes,
        })
    }

    pub fn to_breeding_command(request: AnimalEventRequest) -> Result<BreedingCommand, AnimalValidationError> {
        let command = match request {
            AnimalEventRequest::RecordHeat { date } => BreedingCommand::RecordHeat { date: parse_date("heat", &date)? },
            AnimalEventRequest::RecordInsemination { date } => {
                BreedingCommand::RecordInsemination { date: parse_date("insemination", &date)? }
            }
            AnimalEventRequest::RecordPregnancyCheck { outcome } => BreedingCommand::RecordPregnancyCheck { outcome },
            AnimalEventRequest::RecordDryOff { date } => BreedingCommand::RecordDryOff { date: parse_date("dry-off", &date)? },
            AnimalEventRequest::RecordCalving { date } => BreedingCommand::RecordCalving { date: parse_date("calving", &date)? },
            AnimalEventRequest::RecordMiscarriage => BreedingCommand::RecordMiscarriage,
            AnimalEventRequest::ToggleHoofCare => BreedingCommand::ToggleHoofCare,
            AnimalEventRequest::ToggleSortedOut => BreedingCommand::ToggleSortedOut,
            AnimalEventRequest::RecordExit { date, reason } => {
                BreedingCommand::RecordExit { date: parse_date("exit", &date)?, reason }
            }
        };
        Ok(command)
    }
}

pub fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|date| date.format(DATE_FORMAT).to_string())
}

pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, AnimalValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| AnimalValidationError::InvalidDate { field, value: value.to_string() })
}

/// Empty strings count as "no date"
fn parse_optional_date(field: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>, AnimalValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_date(field, text).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::{ExitReason, PregnancyCheck};

    use crate::domain::models::HerdExit;

    #[test]
    fn test_to_dto_formats_dates() {
        let mut animal = DomainAnimal::new("Hanna".to_string(), "AT 7".to_string(), Utc::now());
        animal.id = 7;
        animal.calving_date = NaiveDate::from_ymd_opt(2026, 2, 3);
        animal.active = false;
        animal.exit = Some(HerdExit { date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(), reason: ExitReason::Died });

        let dto = AnimalMapper::to_dto(animal);

        assert_eq!(dto.calving_date.as_deref(), Some("2026-02-03"));
        assert_eq!(dto.birth_date, None);
        assert_eq!(dto.exit_date.as_deref(), Some("2026-05-01"));
        assert_eq!(dto.exit_reason, Some(ExitReason::Died));
    }

    #[test]
    fn test_create_request_with_blank_dates() {
        let request = CreateAnimalRequest {
            name: "Ida".to_string(),
            tag_number: "AT 8".to_string(),
            birth_date: Some("2024-04-30".to_string()),
            calving_date: Some("".to_string()),
            insemination_date: None,
            pregnant: false,
            notes: None,
        };

        let command = AnimalMapper::to_create_command(request).unwrap();

        assert_eq!(command.birth_date, NaiveDate::from_ymd_opt(2024, 4, 30));
        assert_eq!(command.calving_date, None);
    }

    #[test]
    fn test_update_request_distinguishes_absent_and_blank_birth_date() {
        let unchanged = AnimalMapper::to_update_command(UpdateAnimalRequest::default()).unwrap();
        assert_eq!(unchanged.birth_date, None);

        let cleared = AnimalMapper::to_update_command(UpdateAnimalRequest {
            birth_date: Some(" ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(cleared.birth_date, Some(None));

        let set = AnimalMapper::to_update_command(UpdateAnimalRequest {
            birth_date: Some("2023-05-06".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(set.birth_date, Some(NaiveDate::from_ymd_opt(2023, 5, 6)));
    }

    #[test]
    fn test_invalid_date_names_the_field() {
        let request = AnimalEventRequest::RecordCalving { date: "31.12.2025".to_string() };

        let err = AnimalMapper::to_breeding_command(request).unwrap_err();

        assert_eq!(
            err,
            AnimalValidationError::InvalidDate { field: "calving", value: "31.12.2025".to_string() }
        );
    }

    #[test]
    fn test_event_request_maps_to_command() {
        let command = AnimalMapper::to_breeding_command(AnimalEventRequest::RecordPregnancyCheck {
            outcome: PregnancyCheck::Uncertain,
        })
        .unwrap();
        assert_eq!(command, BreedingCommand::RecordPregnancyCheck { outcome: PregnancyCheck::Uncertain });

        let command = AnimalMapper::to_breeding_command(AnimalEventRequest::RecordExit {
            date: "2026-04-02".to_string(),
            reason: ExitReason::Sold,
        })
        .unwrap();
        assert_eq!(
            command,
            BreedingCommand::RecordExit { date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(), reason: ExitReason::Sold }
        );
    }
}
