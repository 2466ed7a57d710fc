pub mod animal;

pub use animal::{ensure_not_future, validate_name, validate_tag, Animal, AnimalValidationError, HerdExit};
