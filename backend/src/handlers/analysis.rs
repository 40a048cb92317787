//! Purchasing analysis handlers

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::datasets::read_upload;
use crate::error::AppResult;
use crate::models::{AnalysisReport, ReportFilter, SupplierSummary, UrgencyBucket};
use crate::services::planning::{AnalysisParams, DatasetAnalysis};
use crate::services::{PlanningService, ReportingService};
use crate::AppState;

/// Query string of the analysis endpoints
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisQuery {
    pub target_months: Option<Decimal>,
    pub lead_time_days: Option<u32>,
    pub reference_date: Option<NaiveDate>,
    pub version: Option<i64>,
    pub urgency: Option<UrgencyBucket>,
    pub supplier: Option<String>,
    pub search: Option<String>,
    pub only_to_order: Option<bool>,
}

impl AnalysisQuery {
    pub fn params(&self) -> AnalysisParams {
        AnalysisParams {
            target_months: self.target_months,
            lead_time_days: self.lead_time_days,
            reference_date: self.reference_date,
            version: self.version,
        }
    }

    pub fn filter(&self) -> ReportFilter {
        ReportFilter {
            urgency: self.urgency,
            supplier: self.supplier.clone().filter(|s| !s.trim().is_empty()),
            search: self.search.clone().filter(|s| !s.trim().is_empty()),
            only_to_order: self.only_to_order.unwrap_or(false),
        }
    }
}

/// Full report for a company's active (or requested) dataset version
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(company): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> AppResult<Json<DatasetAnalysis>> {
    let service = PlanningService::new(state.store.clone(), state.config.planning.clone());
    let analysis = service
        .analyze_company(&company, &query.params(), &query.filter())
        .await?;
    Ok(Json(analysis))
}

/// Purchasing totals per supplier
pub async fn get_supplier_summary(
    State(state): State<AppState>,
    Path(company): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> AppResult<Json<Vec<SupplierSummary>>> {
    let service = PlanningService::new(state.store.clone(), state.config.planning.clone());
    let summary = service.supplier_summary(&company, &query.params()).await?;
    Ok(Json(summary))
}

/// Purchase list as CSV: items with a recommended purchase, most urgent first
pub async fn export_purchase_list(
    State(state): State<AppState>,
    Path(company): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> AppResult<impl IntoResponse> {
    let service = PlanningService::new(state.store.clone(), state.config.planning.clone());
    let mut filter = query.filter();
    filter.only_to_order = true;

    let analysis = service
        .analyze_company(&company, &query.params(), &filter)
        .await?;
    let lines = ReportingService::purchase_lines(&analysis.report.items);
    let csv = ReportingService::export_to_csv(&lines)?;

    let disposition = format!(
        "attachment; filename=\"purchase_list_{}_v{}_{}.csv\"",
        analysis.dataset.company, analysis.dataset.version_number, analysis.report.reference_date
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

/// Analyze an uploaded spreadsheet without storing it
pub async fn preview_analysis(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
    multipart: Multipart,
) -> AppResult<Json<AnalysisReport>> {
    let (file, _) = read_upload(multipart).await?;
    let service = PlanningService::new(state.store.clone(), state.config.planning.clone());

    let mut report = service.preview(file, &query.params()).await?;
    let filter = query.filter();
    if !filter.is_empty() {
        report.items = filter.apply(&report.items).into_iter().cloned().collect();
    }
    Ok(Json(report))
}
