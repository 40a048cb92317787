//! HTTP handlers for the Replenishment Dashboard API

pub mod analysis;
pub mod datasets;
pub mod health;

pub use analysis::*;
pub use datasets::*;
pub use health::*;
