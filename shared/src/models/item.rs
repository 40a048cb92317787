//! Purchasing dataset models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A raw table as handed over by a spreadsheet reader or warehouse query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }
}

/// One validated row of a purchasing dataset.
///
/// `item_code` is not unique: the same code may appear for distinct batches
/// or models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub item_code: String,
    pub model: String,
    pub supplier: String,
    /// Quantity column of the sheet (last ordered quantity), informational
    pub order_quantity: Decimal,
    pub unit_price: Decimal,
    pub stock_on_hand: Decimal,
    pub in_transit: Decimal,
    pub avg_monthly_sales: Decimal,
    /// Cubic meters per unit
    pub volume_cbm: Decimal,
    pub moq: u32,
}

impl ItemRecord {
    /// Stock on hand plus stock already shipped, `None` on overflow
    pub fn available_stock(&self) -> Option<Decimal> {
        self.stock_on_hand.checked_add(self.in_transit)
    }
}
