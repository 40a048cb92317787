//! Reporting service for purchase list exports

use rust_decimal::Decimal;
use serde::Serialize;
use shared::DerivedMetrics;

use crate::error::{AppError, AppResult};

/// Reporting service
pub struct ReportingService;

/// One line of the exported purchase list
#[derive(Debug, Serialize)]
pub struct PurchaseLine {
    #[serde(rename = "Item")]
    pub item_code: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Supplier")]
    pub supplier: String,
    #[serde(rename = "Urgency")]
    pub urgency: String,
    #[serde(rename = "Months Remaining")]
    pub months_remaining: String,
    #[serde(rename = "Runout Date")]
    pub runout_date: String,
    #[serde(rename = "Order By")]
    pub order_by_date: String,
    #[serde(rename = "Available Stock")]
    pub available_stock: Decimal,
    #[serde(rename = "Average Sales")]
    pub avg_monthly_sales: Decimal,
    #[serde(rename = "MOQ")]
    pub moq: u32,
    #[serde(rename = "Purchase Qty")]
    pub purchase_qty: Decimal,
    #[serde(rename = "MOQ Multiples")]
    pub moq_multiples: Decimal,
    #[serde(rename = "Unit Price")]
    pub unit_price: Decimal,
    #[serde(rename = "Investment")]
    pub investment: Decimal,
    #[serde(rename = "Volume (CBM)")]
    pub order_volume_cbm: Decimal,
}

impl From<&DerivedMetrics> for PurchaseLine {
    fn from(item: &DerivedMetrics) -> Self {
        let optional = |value: Option<String>| value.unwrap_or_default();
        Self {
            item_code: item.item_code.clone(),
            model: item.model.clone(),
            supplier: item.supplier.clone(),
            urgency: item.urgency.to_string(),
            months_remaining: optional(
                item.months_remaining
                    .as_finite()
                    .map(|m| m.round_dp(2).to_string()),
            ),
            runout_date: optional(item.runout_date.map(|d| d.to_string())),
            order_by_date: optional(item.order_by_date.map(|d| d.to_string())),
            available_stock: item.available_stock,
            avg_monthly_sales: item.avg_monthly_sales,
            moq: item.moq,
            purchase_qty: item.recommended_purchase_qty,
            moq_multiples: item.moq_multiples,
            unit_price: item.unit_price,
            investment: item.recommended_investment,
            order_volume_cbm: item.order_volume_cbm,
        }
    }
}

impl ReportingService {
    /// Purchase list lines in report order
    pub fn purchase_lines<'a>(items: impl IntoIterator<Item = &'a DerivedMetrics>) -> Vec<PurchaseLine> {
        items.into_iter().map(PurchaseLine::from).collect()
    }

    /// Export data to CSV format
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
