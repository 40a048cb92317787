//! Common types used across the platform

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::ConfigurationError;
use crate::validation::validate_target_months;

/// Default desired months of coverage
pub const DEFAULT_TARGET_MONTHS: u32 = 6;

/// Default supplier lead time between order and arrival
pub const DEFAULT_LEAD_TIME_DAYS: u32 = 45;

/// Month length used to turn months of stock into days
pub const DAYS_PER_MONTH: u32 = 30;

/// Parameters of one analysis pass.
///
/// Passed explicitly into every calculation; nothing in the core reads the
/// wall clock or global settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisContext {
    target_months: Decimal,
    reference_date: NaiveDate,
    lead_time_days: u32,
}

impl AnalysisContext {
    /// Build a context, rejecting `target_months <= 0`
    pub fn new(target_months: Decimal, reference_date: NaiveDate) -> Result<Self, ConfigurationError> {
        validate_target_months(target_months)?;
        Ok(Self {
            target_months,
            reference_date,
            lead_time_days: DEFAULT_LEAD_TIME_DAYS,
        })
    }

    pub fn with_lead_time_days(mut self, lead_time_days: u32) -> Self {
        self.lead_time_days = lead_time_days;
        self
    }

    pub fn target_months(&self) -> Decimal {
        self.target_months
    }

    /// "Today" for runout and order-by dates
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn lead_time_days(&self) -> u32 {
        self.lead_time_days
    }
}
