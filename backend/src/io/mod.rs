//! # IO Module
//!
//! Adapter layer between the kiosk front-end and the domain: axum handlers
//! that translate JSON requests into domain commands and domain results into
//! the DTOs of the `shared` crate.

pub mod rest;

pub use rest::*;
