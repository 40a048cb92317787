//! Dataset warehouse collaborator
//!
//! Persists validated purchasing datasets as numbered versions per company,
//! exactly one of which is active at a time.

use std::collections::HashMap;

use chrono::Utc;
use shared::{DatasetVersion, ItemRecord, StoredDataset};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// A validated dataset about to become a new version
#[derive(Debug, Clone)]
pub struct NewDataset {
    pub company: String,
    pub source_file: Option<String>,
    pub description: Option<String>,
    pub created_by: Option<String>,
    pub checksum: Option<String>,
    pub records: Vec<ItemRecord>,
}

/// Storage of versioned datasets
#[axum::async_trait]
pub trait DatasetStore: Send + Sync {
    /// Store as `max(version_number) + 1` for the company and activate it
    async fn store(&self, dataset: NewDataset) -> AppResult<DatasetVersion>;

    /// A specific version, or the active one when `version_number` is `None`
    async fn fetch(&self, company: &str, version_number: Option<i64>) -> AppResult<StoredDataset>;

    /// Newest first
    async fn list_versions(&self, company: &str, limit: i64) -> AppResult<Vec<DatasetVersion>>;

    async fn activate(&self, company: &str, version_number: i64) -> AppResult<DatasetVersion>;

    /// Remove an inactive version; the active one must be replaced first
    async fn delete_version(&self, company: &str, version_number: i64) -> AppResult<()>;

    /// Remove every version of a company, returning how many were removed
    async fn delete_company(&self, company: &str) -> AppResult<u64>;

    /// Short backend status for the health endpoint
    async fn status(&self) -> String;
}

pub(crate) fn version_not_found(company: &str, version_number: Option<i64>) -> AppError {
    match version_number {
        Some(v) => AppError::NotFound(format!("Dataset version {} for company {}", v, company)),
        None => AppError::NotFound(format!("Active dataset for company {}", company)),
    }
}

pub(crate) fn active_version_conflict(company: &str, version_number: i64) -> AppError {
    AppError::Conflict {
        resource: "version".to_string(),
        message: format!(
            "Dataset version {} is active for company {}; activate another version first",
            version_number, company
        ),
        message_pt: format!(
            "A versão {} é a versão ativa da empresa {}; ative outra versão antes",
            version_number, company
        ),
    }
}

pub(crate) fn company_not_found(company: &str) -> AppError {
    AppError::NotFound(format!("Datasets for company {}", company))
}

/// In-process store, used by default and in tests
#[derive(Default)]
pub struct MemoryStore {
    datasets: RwLock<HashMap<String, Vec<StoredDataset>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[axum::async_trait]
impl DatasetStore for MemoryStore {
    async fn store(&self, dataset: NewDataset) -> AppResult<DatasetVersion> {
        let mut datasets = self.datasets.write().await;
        let versions = datasets.entry(dataset.company.clone()).or_default();

        let version_number = versions
            .iter()
            .map(|d| d.version.version_number)
            .max()
            .unwrap_or(0)
            + 1;
        for existing in versions.iter_mut() {
            existing.version.is_active = false;
        }

        let version = DatasetVersion {
            id: Uuid::new_v4(),
            company: dataset.company,
            version_number,
            is_active: true,
            source_file: dataset.source_file,
            description: dataset.description,
            created_by: dataset.created_by,
            row_count: dataset.records.len() as i64,
            checksum: dataset.checksum,
            uploaded_at: Utc::now(),
        };
        versions.push(StoredDataset {
            version: version.clone(),
            records: dataset.records,
        });

        Ok(version)
    }

    async fn fetch(&self, company: &str, version_number: Option<i64>) -> AppResult<StoredDataset> {
        let datasets = self.datasets.read().await;
        datasets
            .get(company)
            .and_then(|versions| {
                versions.iter().find(|d| match version_number {
                    Some(v) => d.version.version_number == v,
                    None => d.version.is_active,
                })
            })
            .cloned()
            .ok_or_else(|| version_not_found(company, version_number))
    }

    async fn list_versions(&self, company: &str, limit: i64) -> AppResult<Vec<DatasetVersion>> {
        let datasets = self.datasets.read().await;
        let mut versions: Vec<DatasetVersion> = datasets
            .get(company)
            .map(|versions| versions.iter().map(|d| d.version.clone()).collect())
            .unwrap_or_default();
        versions.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        versions.truncate(limit.max(0) as usize);
        Ok(versions)
    }

    async fn activate(&self, company: &str, version_number: i64) -> AppResult<DatasetVersion> {
        let mut datasets = self.datasets.write().await;
        let versions = datasets
            .get_mut(company)
            .filter(|versions| {
                versions
                    .iter()
                    .any(|d| d.version.version_number == version_number)
            })
            .ok_or_else(|| version_not_found(company, Some(version_number)))?;

        let mut activated = None;
        for dataset in versions.iter_mut() {
            dataset.version.is_active = dataset.version.version_number == version_number;
            if dataset.version.is_active {
                activated = Some(dataset.version.clone());
            }
        }
        activated.ok_or_else(|| version_not_found(company, Some(version_number)))
    }

    async fn delete_version(&self, company: &str, version_number: i64) -> AppResult<()> {
        let mut datasets = self.datasets.write().await;
        let versions = datasets
            .get_mut(company)
            .ok_or_else(|| version_not_found(company, Some(version_number)))?;
        let index = versions
            .iter()
            .position(|d| d.version.version_number == version_number)
            .ok_or_else(|| version_not_found(company, Some(version_number)))?;

        if versions[index].version.is_active {
            return Err(active_version_conflict(company, version_number));
        }
        versions.remove(index);
        Ok(())
    }

    async fn delete_company(&self, company: &str) -> AppResult<u64> {
        let mut datasets = self.datasets.write().await;
        match datasets.remove(company) {
            Some(versions) if !versions.is_empty() => Ok(versions.len() as u64),
            _ => Err(company_not_found(company)),
        }
    }

    async fn status(&self) -> String {
        "memory".to_string()
    }
}
