//! # Domain Module
//!
//! Business logic of the herd kiosk: the breeding-cycle engine and the
//! services built around it. Nothing in here knows about HTTP; storage is
//! reached only through the [`crate::storage::AnimalStorage`] trait.
//!
//! ## Module Organization
//!
//! - **breeding**: milestone projection (next heat, pregnancy check, dry-off, calving)
//! - **queues**: queue membership predicates and urgency ordering
//! - **models**: the animal record and its breeding state machine
//! - **commands**: command and query types consumed by the services
//! - **animal_service**: registration, detail edits and breeding events
//! - **dashboard_service**: queues with milestones for today
//! - **forecast**: projected milking occupancy over the coming months
//! - **stall_board**: in-memory milking-parlor assignment
//! - **clock**: injectable source of "today"
//!
//! ## Business Rules
//!
//! - An animal without a calving date is a heifer; with one, a cow
//! - Queue membership is derived from recorded dates and flags, never stored
//! - Every date projection takes today as an argument
//! - Inactive animals keep their history but drop out of every queue

pub mod animal_service;
pub mod breeding;
pub mod clock;
pub mod commands;
pub mod dashboard_service;
pub mod errors;
pub mod forecast;
pub mod models;
pub mod queues;
pub mod stall_board;

pub use animal_service::AnimalService;
pub use breeding::BreedingConstants;
pub use clock::{Clock, SystemClock};
pub use dashboard_service::DashboardService;
pub use errors::AnimalError;
pub use forecast::{ForecastService, ForecastSettings};
pub use stall_board::{ParlorSettings, StallBoard, StallBoardError};
