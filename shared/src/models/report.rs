//! Aggregated report models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DerivedMetrics, UrgencyBucket};

/// Item counts per urgency bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCounts {
    pub critical: usize,
    pub medium: usize,
    pub attention: usize,
    pub ok: usize,
}

impl BucketCounts {
    pub fn record(&mut self, bucket: UrgencyBucket) {
        match bucket {
            UrgencyBucket::Critical => self.critical += 1,
            UrgencyBucket::Medium => self.medium += 1,
            UrgencyBucket::Attention => self.attention += 1,
            UrgencyBucket::Ok => self.ok += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.medium + self.attention + self.ok
    }
}

/// Result of one analysis pass over a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub target_months: Decimal,
    pub lead_time_days: u32,
    pub reference_date: NaiveDate,
    pub item_count: usize,
    pub items_to_order: usize,
    pub total_investment: Decimal,
    pub total_purchase_units: Decimal,
    pub total_order_volume_cbm: Decimal,
    pub bucket_counts: BucketCounts,
    /// Most urgent first; unbounded runout last
    pub items: Vec<DerivedMetrics>,
}

/// Purchasing totals for one supplier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierSummary {
    pub supplier: String,
    pub item_count: usize,
    pub items_to_order: usize,
    pub critical_count: usize,
    pub purchase_units: Decimal,
    pub investment: Decimal,
}

/// Item filter for dashboard tables and exports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub urgency: Option<UrgencyBucket>,
    /// Case-insensitive exact supplier name
    pub supplier: Option<String>,
    /// Case-insensitive substring of item code or model
    pub search: Option<String>,
    #[serde(default)]
    pub only_to_order: bool,
}

impl ReportFilter {
    pub fn is_empty(&self) -> bool {
        self.urgency.is_none()
            && self.supplier.is_none()
            && self.search.is_none()
            && !self.only_to_order
    }

    pub fn matches(&self, item: &DerivedMetrics) -> bool {
        if let Some(urgency) = self.urgency {
            if item.urgency != urgency {
                return false;
            }
        }
        if let Some(supplier) = &self.supplier {
            if item.supplier.to_lowercase() != supplier.trim().to_lowercase() {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty()
                && !item.item_code.to_lowercase().contains(&needle)
                && !item.model.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if self.only_to_order && !item.needs_order() {
            return false;
        }
        true
    }

    /// Items matching the filter, in their original order
    pub fn apply<'a>(&self, items: &'a [DerivedMetrics]) -> Vec<&'a DerivedMetrics> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}
