use chrono::{DateTime, NaiveDate, Utc};
use shared::{ExitReason, PregnancyCheck};

use crate::domain::commands::animals::BreedingCommand;

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_TAG_LENGTH: usize = 32;

/// Date and reason recorded when an animal leaves the herd
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HerdExit {
    pub date: NaiveDate,
    pub reason: ExitReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animal {
    pub id: i64,
    pub name: String,
    pub tag_number: String,
    pub birth_date: Option<NaiveDate>,
    pub last_heat: Option<NaiveDate>,
    pub insemination_date: Option<NaiveDate>,
    pub insemination_attempts: u32,
    pub pregnancy_check: PregnancyCheck,
    pub dry_off_date: Option<NaiveDate>,
    pub calving_date: Option<NaiveDate>,
    pub hoof_care_needed: bool,
    pub sorted_out: bool,
    pub active: bool,
    /// Present exactly when `active` is false
    pub exit: Option<HerdExit>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnimalValidationError {
    #[error("Name cannot be empty")]
    EmptyName,
    #[error("Name cannot exceed 100 characters")]
    NameTooLong,
    #[error("Tag number cannot be empty")]
    EmptyTag,
    #[error("Tag number cannot exceed 32 characters")]
    TagTooLong,
    #[error("Invalid {field} date '{value}', expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },
    #[error("The {field} date {date} lies in the future")]
    FutureDate { field: &'static str, date: NaiveDate },
    #[error("Animal has left the herd")]
    Inactive,
    #[error("Animal has already left the herd")]
    AlreadyExited,
    #[error("No insemination on record")]
    NoInsemination,
    #[error("Animal is not confirmed pregnant")]
    NotPregnant,
    #[error("Pregnancy check outcome must be positive, negative or uncertain")]
    UnsetOutcome,
}

impl Animal {
    /// A record that has not been stored yet (id 0)
    pub fn new(name: String, tag_number: String, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            name,
            tag_number,
            birth_date: None,
            last_heat: None,
            insemination_date: None,
            insemination_attempts: 0,
            pregnancy_check: PregnancyCheck::Unset,
            dry_off_date: None,
            calving_date: None,
            hoof_care_needed: false,
            sorted_out: false,
            active: true,
            exit: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Not calved yet
    pub fn is_heifer(&self) -> bool {
        self.calving_date.is_none()
    }

    pub fn is_cow(&self) -> bool {
        self.calving_date.is_some()
    }

    pub fn is_pregnant(&self) -> bool {
        self.pregnancy_check == PregnancyCheck::Positive
    }

    /// Apply a breeding or lifecycle command, enforcing the cycle invariants.
    ///
    /// On error the record is left untouched.
    pub fn apply(&mut self, command: BreedingCommand, today: NaiveDate) -> Result<(), AnimalValidationError> {
        match command {
            BreedingCommand::RecordExit { date, reason } => {
                if !self.active {
                    return Err(AnimalValidationError::AlreadyExited);
                }
                ensure_not_future("exit", date, today)?;
                self.active = false;
                self.exit = Some(HerdExit { date, reason });
            }
            _ if !self.active => return Err(AnimalValidationError::Inactive),
            BreedingCommand::RecordHeat { date } => {
                ensure_not_future("heat", date, today)?;
                self.last_heat = Some(date);
            }
            BreedingCommand::RecordInsemination { date } => {
                ensure_not_future("insemination", date, today)?;
                self.insemination_date = Some(date);
                // The insemination day is the heat the next cycle is counted from
                self.last_heat = Some(date);
                self.insemination_attempts = self.insemination_attempts.saturating_add(1);
                self.pregnancy_check = PregnancyCheck::Unset;
            }
            BreedingCommand::RecordPregnancyCheck { outcome } => {
                if outcome == PregnancyCheck::Unset {
                    return Err(AnimalValidationError::UnsetOutcome);
                }
                if self.insemination_date.is_none() {
                    return Err(AnimalValidationError::NoInsemination);
                }
                self.pregnancy_check = outcome;
            }
            BreedingCommand::RecordDryOff { date } => {
                ensure_not_future("dry-off", date, today)?;
                if !self.is_pregnant() {
                    return Err(AnimalValidationError::NotPregnant);
                }
                self.dry_off_date = Some(date);
            }
            BreedingCommand::RecordCalving { date } => {
                ensure_not_future("calving", date, today)?;
                self.calving_date = Some(date);
                self.reset_cycle();
                self.last_heat = None;
            }
            BreedingCommand::RecordMiscarriage => {
                if self.insemination_date.is_none() {
                    return Err(AnimalValidationError::NoInsemination);
                }
                self.reset_cycle();
            }
            BreedingCommand::ToggleHoofCare => {
                self.hoof_care_needed = !self.hoof_care_needed;
            }
            BreedingCommand::ToggleSortedOut => {
                self.sorted_out = !self.sorted_out;
            }
        }

        Ok(())
    }

    fn reset_cycle(&mut self) {
        self.insemination_date = None;
        self.insemination_attempts = 0;
        self.pregnancy_check = PregnancyCheck::Unset;
        self.dry_off_date = None;
    }
}

pub fn validate_name(name: &str) -> Result<(), AnimalValidationError> {
    if name.trim().is_empty() {
        return Err(AnimalValidationError::EmptyName);
    }
    if name.trim().chars().count() > MAX_NAME_LENGTH {
        return Err(AnimalValidationError::NameTooLong);
    }
    Ok(())
}

pub fn validate_tag(tag_number: &str) -> Result<(), AnimalValidationError> {
    if tag_number.trim().is_empty() {
        return Err(AnimalValidationError::EmptyTag);
    }
    if tag_number.trim().chars().count() > MAX_TAG_LENGTH {
        return Err(AnimalValidationError::TagTooLong);
    }
    Ok(())
}

pub fn ensure_not_future(field: &'static str, date: NaiveDate, today: NaiveDate) -> Result<(), AnimalValidationError> {
    if date > today {
        return Err(AnimalValidationError::FutureDate { field, date });
    }
    Ok(())
}
