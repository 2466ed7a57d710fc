//! Domain-level command and query types
//! These types are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the DTOs defined in the
//! `shared` crate to these types.

pub mod animals {
    use chrono::NaiveDate;
    use shared::{ExitReason, PregnancyCheck};

    /// Input for registering a new animal.
    #[derive(Debug, Clone)]
    pub struct CreateAnimalCommand {
        pub name: String,
        pub tag_number: String,
        pub birth_date: Option<NaiveDate>,
        pub calving_date: Option<NaiveDate>,
        pub insemination_date: Option<NaiveDate>,
        pub pregnant: bool,
        pub notes: Option<String>,
    }

    /// Administrative correction of identity fields. `None` leaves a field unchanged.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateAnimalDetailsCommand {
        pub name: Option<String>,
        pub tag_number: Option<String>,
        /// `Some(None)` removes the birth date
        pub birth_date: Option<Option<NaiveDate>>,
        pub notes: Option<String>,
    }

    /// Query parameters for listing animals.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct ListAnimalsQuery {
        pub active_only: bool,
    }

    /// The permitted mutations of an animal's breeding and lifecycle state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum BreedingCommand {
        RecordHeat { date: NaiveDate },
        RecordInsemination { date: NaiveDate },
        RecordPregnancyCheck { outcome: PregnancyCheck },
        RecordDryOff { date: NaiveDate },
        RecordCalving { date: NaiveDate },
        RecordMiscarriage,
        ToggleHoofCare,
        ToggleSortedOut,
        RecordExit { date: NaiveDate, reason: ExitReason },
    }

    impl BreedingCommand {
        /// Short name used in log lines and confirmation messages
        pub fn name(&self) -> &'static str {
            match self {
                BreedingCommand::RecordHeat { .. } => "heat",
                BreedingCommand::RecordInsemination { .. } => "insemination",
                BreedingCommand::RecordPregnancyCheck { .. } => "pregnancy check",
                BreedingCommand::RecordDryOff { .. } => "dry-off",
                BreedingCommand::RecordCalving { .. } => "calving",
                BreedingCommand::RecordMiscarriage => "miscarriage",
                BreedingCommand::ToggleHoofCare => "hoof care",
                BreedingCommand::ToggleSortedOut => "sorted out",
                BreedingCommand::RecordExit { .. } => "herd exit",
            }
        }
    }
}
