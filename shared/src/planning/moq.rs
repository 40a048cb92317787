//! MOQ optimizer: purchase quantity needed to reach the target coverage

use rust_decimal::Decimal;

use crate::models::{ItemRecord, MonthsRemaining};

/// Recommended purchase for one item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchasePlan {
    pub shortfall_units: Decimal,
    pub purchase_qty: Decimal,
    pub moq_multiples: Decimal,
    pub investment: Decimal,
    pub order_volume_cbm: Decimal,
}

impl PurchasePlan {
    pub fn none() -> Self {
        Self {
            shortfall_units: Decimal::ZERO,
            purchase_qty: Decimal::ZERO,
            moq_multiples: Decimal::ZERO,
            investment: Decimal::ZERO,
            order_volume_cbm: Decimal::ZERO,
        }
    }
}

/// Units missing to cover `target_months` of sales, rounded up.
///
/// Computed as `target * sales - available`, which equals
/// `(target - months_remaining) * sales` without the division's rounding.
/// `None` when an intermediate value overflows.
pub fn shortfall_units(record: &ItemRecord, target_months: Decimal) -> Option<Decimal> {
    let demand = target_months.checked_mul(record.avg_monthly_sales)?;
    let shortfall = demand.checked_sub(record.available_stock()?)?;
    Some(shortfall.ceil().max(Decimal::ZERO))
}

/// Round `units` up to the next whole multiple of `moq`, `None` on overflow
pub fn round_up_to_moq(units: Decimal, moq: u32) -> Option<Decimal> {
    if units <= Decimal::ZERO || moq == 0 {
        return Some(Decimal::ZERO);
    }
    let moq = Decimal::from(moq);
    units.checked_div(moq)?.ceil().checked_mul(moq)
}

/// Size the purchase for an item given its runout and the target coverage
pub fn plan_purchase(
    record: &ItemRecord,
    months: MonthsRemaining,
    target_months: Decimal,
) -> Option<PurchasePlan> {
    if !months.is_below(target_months) || record.moq == 0 {
        return Some(PurchasePlan::none());
    }

    let shortfall = shortfall_units(record, target_months)?;
    let purchase_qty = round_up_to_moq(shortfall, record.moq)?;
    Some(PurchasePlan {
        shortfall_units: shortfall,
        purchase_qty,
        moq_multiples: purchase_qty.checked_div(Decimal::from(record.moq))?,
        investment: purchase_qty.checked_mul(record.unit_price)?,
        order_volume_cbm: purchase_qty.checked_mul(record.volume_cbm)?,
    })
}
