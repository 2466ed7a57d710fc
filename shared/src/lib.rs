use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome recorded at the pregnancy check after an insemination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PregnancyCheck {
    /// No check recorded for the current insemination
    #[default]
    Unset,
    /// Confirmed pregnant
    Positive,
    /// Confirmed not pregnant, animal goes back to heat observation
    Negative,
    /// Inconclusive, animal stays queued for a re-check
    Uncertain,
}

impl PregnancyCheck {
    /// Storage representation (`None` for an unset outcome)
    pub fn as_db_value(&self) -> Option<&'static str> {
        match self {
            PregnancyCheck::Unset => None,
            PregnancyCheck::Positive => Some("positive"),
            PregnancyCheck::Negative => Some("negative"),
            PregnancyCheck::Uncertain => Some("uncertain"),
        }
    }

    pub fn from_db_value(value: Option<&str>) -> Option<Self> {
        match value {
            None => Some(PregnancyCheck::Unset),
            Some("positive") => Some(PregnancyCheck::Positive),
            Some("negative") => Some(PregnancyCheck::Negative),
            Some("uncertain") => Some(PregnancyCheck::Uncertain),
            Some(_) => None,
        }
    }
}

/// Why an animal left the herd
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    Sold,
    Slaughtered,
    Died,
}

impl ExitReason {
    pub fn as_db_value(&self) -> &'static str {
        match self {
            ExitReason::Sold => "sold",
            ExitReason::Slaughtered => "slaughtered",
            ExitReason::Died => "died",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "sold" => Some(ExitReason::Sold),
            "slaughtered" => Some(ExitReason::Slaughtered),
            "died" => Some(ExitReason::Died),
            _ => None,
        }
    }
}

/// Operational queue shown as one dashboard view on the kiosk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    /// Heifers old enough to cycle and fresh cows with no heat recorded yet
    HeatObservation,
    /// Animals whose projected heat falls into the watch window around today
    HeatExpected,
    /// Inseminated animals due (or re-due) for a pregnancy check
    PregnancyCheck,
    /// Pregnant cows still being milked
    DryOff,
    /// Pregnant animals heading for calving
    Calving,
    /// Animals flagged for hoof trimming
    HoofCare,
    /// Cows currently dried off
    DriedOff,
    /// Animals that calved within the recent window
    RecentlyCalved,
}

impl QueueKind {
    /// Every queue, in kiosk carousel order
    pub const ALL: [QueueKind; 8] = [
        QueueKind::HeatObservation,
        QueueKind::HeatExpected,
        QueueKind::PregnancyCheck,
        QueueKind::DryOff,
        QueueKind::Calving,
        QueueKind::DriedOff,
        QueueKind::RecentlyCalved,
        QueueKind::HoofCare,
    ];

    /// URL segment used by the dashboard endpoints
    pub fn slug(&self) -> &'static str {
        match self {
            QueueKind::HeatObservation => "heat_observation",
            QueueKind::HeatExpected => "heat_expected",
            QueueKind::PregnancyCheck => "pregnancy_check",
            QueueKind::DryOff => "dry_off",
            QueueKind::Calving => "calving",
            QueueKind::HoofCare => "hoof_care",
            QueueKind::DriedOff => "dried_off",
            QueueKind::RecentlyCalved => "recently_calved",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|queue| queue.slug() == slug)
    }

    /// Human-readable title for the dashboard header
    pub fn title(&self) -> &'static str {
        match self {
            QueueKind::HeatObservation => "Watch for heat",
            QueueKind::HeatExpected => "Heat expected",
            QueueKind::PregnancyCheck => "Pregnancy check",
            QueueKind::DryOff => "Dry off",
            QueueKind::Calving => "Calving",
            QueueKind::HoofCare => "Hoof care needed",
            QueueKind::DriedOff => "Currently dried off",
            QueueKind::RecentlyCalved => "Recently calved",
        }
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Animal record as exchanged with the kiosk. Dates are ISO 8601 (`YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub id: i64,
    pub name: String,
    /// Herd tag number, unique among active animals
    pub tag_number: String,
    pub birth_date: Option<String>,
    pub last_heat: Option<String>,
    pub insemination_date: Option<String>,
    pub insemination_attempts: u32,
    pub pregnancy_check: PregnancyCheck,
    pub dry_off_date: Option<String>,
    /// Most recent calving; absent for heifers
    pub calving_date: Option<String>,
    pub hoof_care_needed: bool,
    pub sorted_out: bool,
    pub active: bool,
    pub exit_date: Option<String>,
    pub exit_reason: Option<ExitReason>,
    pub notes: Option<String>,
    /// RFC 3339
    pub created_at: String,
    /// RFC 3339
    pub updated_at: String,
}

/// Request for registering a new animal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAnimalRequest {
    pub name: String,
    pub tag_number: String,
    pub birth_date: Option<String>,
    /// Most recent calving, turns the new record into a cow
    pub calving_date: Option<String>,
    /// Insemination already on record when the animal is entered
    pub insemination_date: Option<String>,
    /// Marks the recorded insemination as a confirmed pregnancy
    #[serde(default)]
    pub pregnant: bool,
    pub notes: Option<String>,
}

/// Administrative correction of identity fields. Absent fields stay as
/// they are; an empty `birth_date` removes the birth date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAnimalRequest {
    pub name: Option<String>,
    pub tag_number: Option<String>,
    pub birth_date: Option<String>,
    pub notes: Option<String>,
}

/// Breeding or lifecycle event recorded against an animal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimalEventRequest {
    RecordHeat { date: String },
    RecordInsemination { date: String },
    RecordPregnancyCheck { outcome: PregnancyCheck },
    RecordDryOff { date: String },
    RecordCalving { date: String },
    RecordMiscarriage,
    ToggleHoofCare,
    ToggleSortedOut,
    RecordExit { date: String, reason: ExitReason },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalResponse {
    pub animal: Animal,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalListResponse {
    pub animals: Vec<Animal>,
}

/// Projected breeding milestones for one animal, relative to the kiosk's today
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Milestones {
    pub next_heat: Option<String>,
    pub days_until_next_heat: Option<i64>,
    pub pregnancy_check_due: Option<String>,
    pub days_until_pregnancy_check: Option<i64>,
    /// Day from which a returning heat after insemination is watched for
    pub reinsemination_watch: Option<String>,
    pub dry_off_due: Option<String>,
    pub days_until_dry_off: Option<i64>,
    pub calving_due: Option<String>,
    pub days_until_calving: Option<i64>,
    pub age_months: Option<i32>,
    pub days_since_calving: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestonesResponse {
    pub animal_id: i64,
    /// The day the projection was computed for
    pub date: String,
    pub milestones: Milestones,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub animal: Animal,
    pub milestones: Milestones,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueView {
    pub queue: QueueKind,
    pub title: String,
    pub count: usize,
    pub entries: Vec<QueueEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub date: String,
    pub active_animals: usize,
    pub queues: Vec<QueueView>,
}

/// Rating of a forecast month against the herd size thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastLevel {
    BelowMin,
    Ok,
    AboveMax,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastThresholds {
    pub ideal: u32,
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekForecast {
    pub label: String,
    pub start_date: String,
    pub milking: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthForecast {
    pub label: String,
    pub start_date: String,
    /// Rounded mean of the weekly counts
    pub milking: u32,
    pub level: ForecastLevel,
    pub weeks: Vec<WeekForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HerdForecastResponse {
    pub generated_for: String,
    pub active_animals: usize,
    pub average_milking: u32,
    pub max_milking: u32,
    pub thresholds: ForecastThresholds,
    pub months: Vec<MonthForecast>,
}

/// Minimal animal identity shown on a milking stall
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StallAnimal {
    pub id: i64,
    pub name: String,
    pub tag_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stall {
    /// 1-based stall number
    pub stall: u32,
    pub animal: Option<StallAnimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StallBoardSnapshot {
    pub stalls: Vec<Stall>,
    /// Ids of animals already placed during the current milking session
    pub already_milked: Vec<i64>,
    pub session_started_at: Option<String>,
    pub last_update: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignStallRequest {
    pub animal_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilkingCandidate {
    pub animal: StallAnimal,
    pub assigned_stall: Option<u32>,
    pub already_milked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilkingCandidatesResponse {
    pub candidates: Vec<MilkingCandidate>,
}
