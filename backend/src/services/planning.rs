//! Planning service: dataset uploads and purchasing analysis
//!
//! Bridges HTTP input, the dataset store and the pure calculations in
//! `shared::planning`.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared::{
    analyze, normalize, supplier_summary, AnalysisContext, AnalysisReport, DatasetVersion,
    ItemRecord, ReportFilter, SupplierSummary,
};
use validator::{Validate, ValidationError};

use super::spreadsheet::parse_spreadsheet;
use crate::config::PlanningConfig;
use crate::error::{AppError, AppResult};
use crate::external::{DatasetStore, NewDataset};

pub const DEFAULT_VERSION_LIMIT: i64 = 20;
pub const MAX_VERSION_LIMIT: i64 = 100;

/// Planning service
#[derive(Clone)]
pub struct PlanningService {
    store: Arc<dyn DatasetStore>,
    settings: PlanningConfig,
}

/// An uploaded spreadsheet
#[derive(Debug, Clone, Validate)]
pub struct UploadedFile {
    #[validate(length(min = 1, max = 255))]
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Free-text fields sent along with an upload
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UploadMetadata {
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub created_by: Option<String>,
}

#[derive(Debug, Validate)]
struct CompanyKey {
    #[validate(length(min = 1, max = 50), custom = "validate_company_chars")]
    value: String,
}

fn validate_company_chars(value: &str) -> Result<(), ValidationError> {
    if value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        Ok(())
    } else {
        Err(ValidationError::new("company_chars"))
    }
}

/// Analysis parameters; anything left out falls back to configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisParams {
    pub target_months: Option<Decimal>,
    pub lead_time_days: Option<u32>,
    pub reference_date: Option<NaiveDate>,
    pub version: Option<i64>,
}

/// Report of one stored dataset version
#[derive(Debug, Serialize)]
pub struct DatasetAnalysis {
    pub dataset: DatasetVersion,
    /// Items listed after filtering; totals cover the whole dataset
    pub filtered_item_count: usize,
    #[serde(flatten)]
    pub report: AnalysisReport,
}

/// Company keys are stored upper-cased
pub fn company_key(raw: &str) -> AppResult<String> {
    let key = CompanyKey {
        value: raw.trim().to_uppercase(),
    };
    key.validate().map_err(|_| AppError::BadRequest {
        field: Some("company".to_string()),
        message: format!(
            "Invalid company '{}': use 1-50 letters, digits, '-' or '_'",
            raw
        ),
    })?;
    Ok(key.value)
}

/// Hex SHA-256 of an uploaded file
pub fn checksum(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Parse and normalize an upload on the blocking thread pool
async fn read_records(file: UploadedFile) -> AppResult<Vec<ItemRecord>> {
    tokio::task::spawn_blocking(move || -> AppResult<Vec<ItemRecord>> {
        let table = parse_spreadsheet(&file.filename, &file.bytes)?;
        Ok(normalize(&table)?)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Spreadsheet parser task failed: {}", e)))?
}

impl PlanningService {
    pub fn new(store: Arc<dyn DatasetStore>, settings: PlanningConfig) -> Self {
        Self { store, settings }
    }

    /// Build the analysis context, filling gaps from configuration and today's date
    pub fn context(&self, params: &AnalysisParams) -> AppResult<AnalysisContext> {
        let target_months = params
            .target_months
            .unwrap_or_else(|| Decimal::from(self.settings.default_target_months));
        let reference_date = params
            .reference_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let lead_time_days = params
            .lead_time_days
            .unwrap_or(self.settings.lead_time_days);

        Ok(AnalysisContext::new(target_months, reference_date)?.with_lead_time_days(lead_time_days))
    }

    /// Parse, validate and store an uploaded dataset as the company's new active version
    pub async fn upload_dataset(
        &self,
        company: &str,
        file: UploadedFile,
        metadata: UploadMetadata,
    ) -> AppResult<DatasetVersion> {
        let company = company_key(company)?;
        metadata.validate()?;
        file.validate()?;

        let checksum = checksum(&file.bytes);
        let source_file = file.filename.clone();
        let records = read_records(file).await?;

        let version = self
            .store
            .store(NewDataset {
                company,
                source_file: Some(source_file),
                description: metadata.description,
                created_by: metadata.created_by,
                checksum: Some(checksum),
                records,
            })
            .await?;

        tracing::info!(
            company = %version.company,
            version = version.version_number,
            rows = version.row_count,
            "Dataset uploaded"
        );
        Ok(version)
    }

    /// Analyze an uploaded file without storing it
    pub async fn preview(&self, file: UploadedFile, params: &AnalysisParams) -> AppResult<AnalysisReport> {
        let ctx = self.context(params)?;
        let records = read_records(file).await?;
        Ok(analyze(&records, &ctx)?)
    }

    /// Analyze the active (or requested) version of a company's dataset
    pub async fn analyze_company(
        &self,
        company: &str,
        params: &AnalysisParams,
        filter: &ReportFilter,
    ) -> AppResult<DatasetAnalysis> {
        let company = company_key(company)?;
        let ctx = self.context(params)?;
        let dataset = self.store.fetch(&company, params.version).await?;

        let mut report = analyze(&dataset.records, &ctx)?;
        if !filter.is_empty() {
            report.items = filter.apply(&report.items).into_iter().cloned().collect();
        }

        tracing::debug!(
            company = %company,
            version = dataset.version.version_number,
            items = report.item_count,
            to_order = report.items_to_order,
            "Analysis complete"
        );
        Ok(DatasetAnalysis {
            dataset: dataset.version,
            filtered_item_count: report.items.len(),
            report,
        })
    }

    /// Purchasing totals per supplier for a company's dataset
    pub async fn supplier_summary(
        &self,
        company: &str,
        params: &AnalysisParams,
    ) -> AppResult<Vec<SupplierSummary>> {
        let analysis = self
            .analyze_company(company, params, &ReportFilter::default())
            .await?;
        Ok(supplier_summary(&analysis.report.items)?)
    }

    pub async fn list_versions(
        &self,
        company: &str,
        limit: Option<i64>,
    ) -> AppResult<Vec<DatasetVersion>> {
        let company = company_key(company)?;
        let limit = limit
            .unwrap_or(DEFAULT_VERSION_LIMIT)
            .clamp(1, MAX_VERSION_LIMIT);
        self.store.list_versions(&company, limit).await
    }

    pub async fn activate_version(
        &self,
        company: &str,
        version_number: i64,
    ) -> AppResult<DatasetVersion> {
        let company = company_key(company)?;
        let version = self.store.activate(&company, version_number).await?;
        tracing::info!(company = %company, version = version_number, "Dataset version activated");
        Ok(version)
    }

    /// Delete an inactive version of a company's dataset
    pub async fn delete_version(&self, company: &str, version_number: i64) -> AppResult<()> {
        let company = company_key(company)?;
        self.store.delete_version(&company, version_number).await?;
        tracing::info!(company = %company, version = version_number, "Dataset version deleted");
        Ok(())
    }

    /// Delete every stored version of a company's dataset
    pub async fn delete_company(&self, company: &str) -> AppResult<u64> {
        let company = company_key(company)?;
        let removed = self.store.delete_company(&company).await?;
        tracing::warn!(company = %company, versions = removed, "All company datasets deleted");
        Ok(removed)
    }
}
