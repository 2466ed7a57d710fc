//! # Storage Traits
//!
//! Storage abstraction used by the domain layer, so the animal service can
//! run against SQLite in production and an in-memory database in tests.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::Animal;

#[async_trait]
pub trait AnimalStorage: Send + Sync {
    /// Insert a new animal and return its assigned id
    async fn insert_animal(&self, animal: &Animal) -> Result<i64>;

    async fn get_animal(&self, id: i64) -> Result<Option<Animal>>;

    /// List animals ordered by name, optionally only those still in the herd
    async fn list_animals(&self, active_only: bool) -> Result<Vec<Animal>>;

    /// Overwrite every stored field of an existing animal
    async fn update_animal(&self, animal: &Animal) -> Result<()>;

    /// Returns true if the animal was found and deleted
    async fn delete_animal(&self, id: i64) -> Result<bool>;

    /// The active animal carrying `tag_number`, if any
    async fn find_active_by_tag(&self, tag_number: &str) -> Result<Option<Animal>>;
}
