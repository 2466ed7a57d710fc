//! Typed failures raised by the animal service.
//!
//! Services return `anyhow::Result`; the REST layer downcasts to these types
//! to choose a status code.

use crate::domain::models::AnimalValidationError;

#[derive(Debug, thiserror::Error)]
pub enum AnimalError {
    #[error("Animal not found: {0}")]
    NotFound(i64),
    #[error("Tag number '{0}' is already used by an active animal")]
    DuplicateTag(String),
    #[error(transparent)]
    Validation(#[from] AnimalValidationError),
}
