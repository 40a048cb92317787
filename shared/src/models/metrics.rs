//! Per-item derived metrics

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Projected months until available stock is depleted.
///
/// `Unbounded` (no consumption) orders after every finite value and is
/// serialized as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<Decimal>", into = "Option<Decimal>")]
pub enum MonthsRemaining {
    Finite(Decimal),
    Unbounded,
}

impl MonthsRemaining {
    pub fn as_finite(&self) -> Option<Decimal> {
        match self {
            MonthsRemaining::Finite(months) => Some(*months),
            MonthsRemaining::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, MonthsRemaining::Unbounded)
    }

    /// Strictly below `threshold` months; never true for unbounded
    pub fn is_below(&self, threshold: Decimal) -> bool {
        match self {
            MonthsRemaining::Finite(months) => *months < threshold,
            MonthsRemaining::Unbounded => false,
        }
    }
}

impl Ord for MonthsRemaining {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (self, other) {
            (MonthsRemaining::Finite(a), MonthsRemaining::Finite(b)) => a.cmp(b),
            (MonthsRemaining::Finite(_), MonthsRemaining::Unbounded) => Ordering::Less,
            (MonthsRemaining::Unbounded, MonthsRemaining::Finite(_)) => Ordering::Greater,
            (MonthsRemaining::Unbounded, MonthsRemaining::Unbounded) => Ordering::Equal,
        }
    }
}

impl PartialOrd for MonthsRemaining {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl From<Option<Decimal>> for MonthsRemaining {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(MonthsRemaining::Unbounded, MonthsRemaining::Finite)
    }
}

impl From<MonthsRemaining> for Option<Decimal> {
    fn from(value: MonthsRemaining) -> Self {
        value.as_finite()
    }
}

/// Urgency bucket derived from months remaining
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyBucket {
    /// Less than 1 month of stock
    Critical,
    /// 1 to 3 months
    Medium,
    /// 3 to 6 months
    Attention,
    /// 6 months or more, or no consumption
    Ok,
}

impl UrgencyBucket {
    pub const ALL: [UrgencyBucket; 4] = [
        UrgencyBucket::Critical,
        UrgencyBucket::Medium,
        UrgencyBucket::Attention,
        UrgencyBucket::Ok,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyBucket::Critical => "critical",
            UrgencyBucket::Medium => "medium",
            UrgencyBucket::Attention => "attention",
            UrgencyBucket::Ok => "ok",
        }
    }

    /// Chart color for the bucket
    pub fn color(&self) -> &'static str {
        match self {
            UrgencyBucket::Critical => "#FF0000",
            UrgencyBucket::Medium => "#FF8C00",
            UrgencyBucket::Attention => "#FFD700",
            UrgencyBucket::Ok => "#32CD32",
        }
    }
}

impl std::fmt::Display for UrgencyBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrgencyBucket::Critical => write!(f, "Critical"),
            UrgencyBucket::Medium => write!(f, "Medium"),
            UrgencyBucket::Attention => write!(f, "Attention"),
            UrgencyBucket::Ok => write!(f, "OK"),
        }
    }
}

impl std::str::FromStr for UrgencyBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Ok(UrgencyBucket::Critical),
            "medium" => Ok(UrgencyBucket::Medium),
            "attention" => Ok(UrgencyBucket::Attention),
            "ok" => Ok(UrgencyBucket::Ok),
            other => Err(format!("unknown urgency bucket '{}'", other)),
        }
    }
}

/// Metrics computed for one item in one analysis pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub item_code: String,
    pub model: String,
    pub supplier: String,
    pub unit_price: Decimal,
    pub moq: u32,
    pub avg_monthly_sales: Decimal,
    pub available_stock: Decimal,
    pub months_remaining: MonthsRemaining,
    pub days_remaining: Option<i64>,
    pub runout_date: Option<NaiveDate>,
    /// Last day to place an order that arrives before runout
    pub order_by_date: Option<NaiveDate>,
    pub urgency: UrgencyBucket,
    pub shortfall_units: Decimal,
    /// Always a whole multiple of `moq`
    pub recommended_purchase_qty: Decimal,
    pub moq_multiples: Decimal,
    pub recommended_investment: Decimal,
    pub order_volume_cbm: Decimal,
}

impl DerivedMetrics {
    pub fn needs_order(&self) -> bool {
        self.recommended_purchase_qty > Decimal::ZERO
    }
}
