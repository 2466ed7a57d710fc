//! # Storage Module
//!
//! Persistence for animal records.
//!
//! The domain layer only sees the [`AnimalStorage`] trait; the SQLite
//! implementation lives in [`repositories`]. Stall assignments are volatile
//! and never reach this layer.
//!
//! ## Layout
//!
//! - **connection**: pool creation and schema setup
//! - **traits**: the storage abstraction consumed by services
//! - **repositories**: sqlx-backed implementations

pub mod connection;
pub mod repositories;
pub mod traits;

pub use connection::DbConnection;
pub use repositories::AnimalRepository;
pub use traits::AnimalStorage;
