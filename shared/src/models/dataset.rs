//! Stored dataset version models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ItemRecord;

/// Metadata of one stored upload of a company's dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetVersion {
    pub id: Uuid,
    pub company: String,
    /// Sequential per company, starting at 1
    pub version_number: i64,
    pub is_active: bool,
    pub source_file: Option<String>,
    pub description: Option<String>,
    pub created_by: Option<String>,
    pub row_count: i64,
    /// SHA-256 of the uploaded file, hex encoded
    pub checksum: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// A version together with its validated records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDataset {
    pub version: DatasetVersion,
    pub records: Vec<ItemRecord>,
}
