//! API models for the Replenishment Dashboard
//!
//! Re-exports the dataset and report models from the shared crate

pub use shared::models::*;
