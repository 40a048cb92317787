//! Dataset warehouse integrations

pub mod postgres;
pub mod warehouse;

pub use postgres::PgStore;
pub use warehouse::{DatasetStore, MemoryStore, NewDataset};
