//! `recap-domain` — shared types for the recap service.
//!
//! Config structs, the shared error enum, and the activity/report data
//! model. Kept dependency-light so every other crate can pull it in.

pub mod activity;
pub mod config;
pub mod error;
pub mod recap;

pub use error::{Error, Result};
