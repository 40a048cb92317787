//! Domain models for the Replenishment Dashboard

mod dataset;
mod item;
mod metrics;
mod report;

pub use dataset::*;
pub use item::*;
pub use metrics::*;
pub use report::*;
