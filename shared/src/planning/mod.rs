//! Purchasing calculations
//!
//! Pipeline: normalizer → runout → urgency → MOQ optimizer → aggregate.
//! Every function here is pure; the same input and context always produce
//! the same report.

pub mod aggregate;
pub mod moq;
pub mod normalizer;
pub mod runout;
pub mod urgency;

pub use aggregate::{summarize, supplier_summary};
pub use normalizer::normalize;

use crate::error::PlanningError;
use crate::models::{AnalysisReport, DerivedMetrics, ItemRecord, RawTable};
use crate::types::AnalysisContext;

/// Derive every metric for a single item.
///
/// Fails with [`PlanningError::ItemOverflow`] when a metric does not fit in
/// a `Decimal`; normalized records always stay in range.
pub fn analyze_item(record: &ItemRecord, ctx: &AnalysisContext) -> Result<DerivedMetrics, PlanningError> {
    let overflow = |metric: &'static str| PlanningError::ItemOverflow {
        item_code: record.item_code.clone(),
        metric,
    };

    let available_stock = record
        .available_stock()
        .ok_or_else(|| overflow("available stock"))?;
    let months = runout::months_remaining(record).ok_or_else(|| overflow("months remaining"))?;
    let timeline = runout::runout_timeline(months, ctx);
    let plan = moq::plan_purchase(record, months, ctx.target_months())
        .ok_or_else(|| overflow("purchase quantity"))?;

    Ok(DerivedMetrics {
        item_code: record.item_code.clone(),
        model: record.model.clone(),
        supplier: record.supplier.clone(),
        unit_price: record.unit_price,
        moq: record.moq,
        avg_monthly_sales: record.avg_monthly_sales,
        available_stock,
        months_remaining: months,
        days_remaining: timeline.map(|t| t.days_remaining),
        runout_date: timeline.map(|t| t.runout_date),
        order_by_date: timeline.map(|t| t.order_by_date),
        urgency: urgency::classify(months),
        shortfall_units: plan.shortfall_units,
        recommended_purchase_qty: plan.purchase_qty,
        moq_multiples: plan.moq_multiples,
        recommended_investment: plan.investment,
        order_volume_cbm: plan.order_volume_cbm,
    })
}

/// Analyze already validated records
pub fn analyze(records: &[ItemRecord], ctx: &AnalysisContext) -> Result<AnalysisReport, PlanningError> {
    let items = records
        .iter()
        .map(|record| analyze_item(record, ctx))
        .collect::<Result<Vec<_>, _>>()?;
    summarize(items, ctx)
}

/// Normalize a raw table and analyze it in one pass
pub fn run(table: &RawTable, ctx: &AnalysisContext) -> Result<AnalysisReport, PlanningError> {
    let records = normalize(table)?;
    analyze(&records, ctx)
}
