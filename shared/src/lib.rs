//! Shared types and purchasing calculations for the Replenishment Dashboard
//!
//! This crate contains the models and the pure computational core shared
//! between the backend, the browser (via WASM), and other components of the
//! system. Nothing in here performs I/O.

pub mod columns;
pub mod error;
pub mod models;
pub mod planning;
pub mod types;
pub mod validation;

pub use columns::*;
pub use error::*;
pub use models::*;
pub use planning::{analyze, analyze_item, normalize, run, supplier_summary};
pub use types::*;
pub use validation::*;
