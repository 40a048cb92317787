//! WebAssembly module for the Replenishment Dashboard
//!
//! Provides client-side computation for:
//! - Full analysis of a parsed spreadsheet table
//! - Urgency classification and colors
//! - MOQ rounding
//! - Offline cell validation

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use shared::planning::{moq, urgency};
use shared::{AnalysisContext, MonthsRemaining, RawTable, UrgencyBucket};

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

fn context(target_months: f64, reference_date: &str, lead_time_days: u32) -> Result<AnalysisContext, String> {
    let target = Decimal::try_from(target_months)
        .map_err(|e| format!("Invalid target months: {}", e))?;
    let date = NaiveDate::parse_from_str(reference_date, "%Y-%m-%d")
        .map_err(|e| format!("Invalid reference date '{}': {}", reference_date, e))?;
    Ok(AnalysisContext::new(target.normalize(), date)
        .map_err(|e| e.to_string())?
        .with_lead_time_days(lead_time_days))
}

fn analyze_table_json(
    table_json: &str,
    target_months: f64,
    reference_date: &str,
    lead_time_days: u32,
) -> Result<String, String> {
    let table: RawTable =
        serde_json::from_str(table_json).map_err(|e| format!("Invalid table JSON: {}", e))?;
    let ctx = context(target_months, reference_date, lead_time_days)?;
    let report = shared::run(&table, &ctx).map_err(|e| e.to_string())?;
    serde_json::to_string(&report).map_err(|e| e.to_string())
}

fn supplier_summary_json(
    table_json: &str,
    target_months: f64,
    reference_date: &str,
    lead_time_days: u32,
) -> Result<String, String> {
    let table: RawTable =
        serde_json::from_str(table_json).map_err(|e| format!("Invalid table JSON: {}", e))?;
    let ctx = context(target_months, reference_date, lead_time_days)?;
    let report = shared::run(&table, &ctx).map_err(|e| e.to_string())?;
    let summary = shared::supplier_summary(&report.items).map_err(|e| e.to_string())?;
    serde_json::to_string(&summary).map_err(|e| e.to_string())
}

fn round_up(units: f64, moq_units: u32) -> Result<f64, String> {
    let units = Decimal::try_from(units).map_err(|e| format!("Invalid unit count: {}", e))?;
    moq::round_up_to_moq(units.ceil(), moq_units)
        .and_then(|rounded| rounded.to_f64())
        .ok_or_else(|| format!("{} rounded to MOQ {} is out of range", units, moq_units))
}

/// Analyze a `{headers, rows}` table and return the report as JSON
#[wasm_bindgen]
pub fn analyze_table(
    table_json: &str,
    target_months: f64,
    reference_date: &str,
    lead_time_days: u32,
) -> Result<String, JsValue> {
    analyze_table_json(table_json, target_months, reference_date, lead_time_days)
        .map_err(|e| JsValue::from_str(&e))
}

/// Purchasing totals per supplier for a `{headers, rows}` table, as JSON
#[wasm_bindgen]
pub fn summarize_suppliers(
    table_json: &str,
    target_months: f64,
    reference_date: &str,
    lead_time_days: u32,
) -> Result<String, JsValue> {
    supplier_summary_json(table_json, target_months, reference_date, lead_time_days)
        .map_err(|e| JsValue::from_str(&e))
}

/// Urgency bucket name for a number of months remaining; negative means unbounded
#[wasm_bindgen]
pub fn classify_urgency(months_remaining: f64) -> String {
    let months = if months_remaining < 0.0 {
        MonthsRemaining::Unbounded
    } else {
        Decimal::try_from(months_remaining)
            .map(MonthsRemaining::Finite)
            .unwrap_or(MonthsRemaining::Unbounded)
    };
    urgency::classify(months).as_str().to_string()
}

/// Display color of an urgency bucket, empty for an unknown name
#[wasm_bindgen]
pub fn urgency_color(bucket: &str) -> String {
    bucket
        .parse::<UrgencyBucket>()
        .map(|b| b.color().to_string())
        .unwrap_or_default()
}

/// Round a unit count up to the next MOQ multiple
#[wasm_bindgen]
pub fn round_up_to_moq(units: f64, moq_units: u32) -> Result<f64, JsValue> {
    round_up(units, moq_units).map_err(|e| JsValue::from_str(&e))
}

/// Check an MOQ cell before upload
#[wasm_bindgen]
pub fn is_valid_moq(raw: &str) -> bool {
    validate_moq(raw, 1).is_ok()
}
