//! Runout calculator: months of stock left and the resulting dates

use chrono::{Days, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::{ItemRecord, MonthsRemaining};
use crate::types::{AnalysisContext, DAYS_PER_MONTH};

/// `(stock_on_hand + in_transit) / avg_monthly_sales`, unbounded without sales.
///
/// `None` when the quotient does not fit in a `Decimal`.
pub fn months_remaining(record: &ItemRecord) -> Option<MonthsRemaining> {
    if record.avg_monthly_sales <= Decimal::ZERO {
        return Some(MonthsRemaining::Unbounded);
    }
    record
        .available_stock()?
        .checked_div(record.avg_monthly_sales)
        .map(MonthsRemaining::Finite)
}

/// Runout expressed as calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunoutTimeline {
    pub days_remaining: i64,
    pub runout_date: NaiveDate,
    pub order_by_date: NaiveDate,
}

/// Whole days of stock left, counting 30-day months
pub fn days_remaining(months: MonthsRemaining) -> Option<i64> {
    let months = months.as_finite()?;
    months
        .checked_mul(Decimal::from(DAYS_PER_MONTH))?
        .floor()
        .to_i64()
}

/// Runout and order-by dates relative to the context's reference date.
///
/// The order-by date is the runout date minus the lead time, never earlier
/// than the reference date. `None` for unbounded runout.
pub fn runout_timeline(months: MonthsRemaining, ctx: &AnalysisContext) -> Option<RunoutTimeline> {
    let days = days_remaining(months)?;
    let today = ctx.reference_date();
    let runout_date = today.checked_add_days(Days::new(u64::try_from(days).ok()?))?;
    let order_by_date = runout_date
        .checked_sub_days(Days::new(u64::from(ctx.lead_time_days())))
        .map_or(today, |date| date.max(today));

    Some(RunoutTimeline {
        days_remaining: days,
        runout_date,
        order_by_date,
    })
}
