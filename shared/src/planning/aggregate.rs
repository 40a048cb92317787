//! Aggregator: totals, bucket counts and supplier summaries

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::PlanningError;
use crate::models::{AnalysisReport, BucketCounts, DerivedMetrics, SupplierSummary, UrgencyBucket};
use crate::types::AnalysisContext;

fn add(total: Decimal, value: Decimal, metric: &'static str) -> Result<Decimal, PlanningError> {
    total
        .checked_add(value)
        .ok_or(PlanningError::TotalOverflow { metric })
}

/// Build the report for a set of per-item metrics.
///
/// Items are sorted by ascending months remaining (stable, unbounded last).
pub fn summarize(
    mut items: Vec<DerivedMetrics>,
    ctx: &AnalysisContext,
) -> Result<AnalysisReport, PlanningError> {
    items.sort_by(|a, b| a.months_remaining.cmp(&b.months_remaining));

    let mut bucket_counts = BucketCounts::default();
    let mut total_investment = Decimal::ZERO;
    let mut total_purchase_units = Decimal::ZERO;
    let mut total_order_volume_cbm = Decimal::ZERO;
    let mut items_to_order = 0;

    for item in &items {
        bucket_counts.record(item.urgency);
        total_investment = add(total_investment, item.recommended_investment, "total investment")?;
        total_purchase_units =
            add(total_purchase_units, item.recommended_purchase_qty, "total purchase units")?;
        total_order_volume_cbm =
            add(total_order_volume_cbm, item.order_volume_cbm, "total order volume")?;
        if item.needs_order() {
            items_to_order += 1;
        }
    }

    Ok(AnalysisReport {
        target_months: ctx.target_months(),
        lead_time_days: ctx.lead_time_days(),
        reference_date: ctx.reference_date(),
        item_count: items.len(),
        items_to_order,
        total_investment,
        total_purchase_units,
        total_order_volume_cbm,
        bucket_counts,
        items,
    })
}

/// Totals per supplier, largest investment first
pub fn supplier_summary(items: &[DerivedMetrics]) -> Result<Vec<SupplierSummary>, PlanningError> {
    let mut by_supplier: BTreeMap<&str, SupplierSummary> = BTreeMap::new();

    for item in items {
        let entry = by_supplier
            .entry(item.supplier.as_str())
            .or_insert_with(|| SupplierSummary {
                supplier: item.supplier.clone(),
                item_count: 0,
                items_to_order: 0,
                critical_count: 0,
                purchase_units: Decimal::ZERO,
                investment: Decimal::ZERO,
            });
        entry.item_count += 1;
        if item.needs_order() {
            entry.items_to_order += 1;
        }
        if item.urgency == UrgencyBucket::Critical {
            entry.critical_count += 1;
        }
        entry.purchase_units = add(entry.purchase_units, item.recommended_purchase_qty, "supplier purchase units")?;
        entry.investment = add(entry.investment, item.recommended_investment, "supplier investment")?;
    }

    let mut summaries: Vec<SupplierSummary> = by_supplier.into_values().collect();
    // BTreeMap order already breaks ties by supplier name
    summaries.sort_by(|a, b| b.investment.cmp(&a.investment));
    Ok(summaries)
}
