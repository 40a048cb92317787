//! Purchasing calculation tests
//!
//! Tests for the runout, urgency and MOQ pipeline including:
//! - Unbounded runout never triggers a purchase
//! - Purchases are whole MOQ multiples covering the shortfall
//! - Reports are deterministic and internally consistent

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::planning::{moq, runout, urgency};
use shared::{
    analyze, analyze_item, AnalysisContext, ItemRecord, MonthsRemaining, PlanningError, UrgencyBucket,
};
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn ctx(target: &str) -> AnalysisContext {
    AnalysisContext::new(dec(target), reference_date()).unwrap()
}

fn record(stock: Decimal, in_transit: Decimal, sales: Decimal, moq: u32, price: Decimal) -> ItemRecord {
    ItemRecord {
        item_code: "ITEM001".to_string(),
        model: "MODEL-X".to_string(),
        supplier: "ACME".to_string(),
        order_quantity: Decimal::ZERO,
        unit_price: price,
        stock_on_hand: stock,
        in_transit,
        avg_monthly_sales: sales,
        volume_cbm: dec("0.02"),
        moq,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Stock 50 + 10 in transit at 20/month covers exactly the 3-month target
    #[test]
    fn test_covered_item_needs_no_purchase() {
        let item = record(dec("50"), dec("10"), dec("20"), 25, dec("4"));
        let metrics = analyze_item(&item, &ctx("3")).unwrap();

        assert_eq!(metrics.months_remaining, MonthsRemaining::Finite(dec("3")));
        assert_eq!(metrics.urgency, UrgencyBucket::Attention);
        assert_eq!(metrics.recommended_purchase_qty, Decimal::ZERO);
        assert_eq!(metrics.recommended_investment, Decimal::ZERO);
    }

    /// Stock 5 at 20/month: a quarter month left, short 55 units, buy 3 × 25
    #[test]
    fn test_critical_item_rounds_up_to_moq() {
        let item = record(dec("5"), Decimal::ZERO, dec("20"), 25, dec("4"));
        let metrics = analyze_item(&item, &ctx("3")).unwrap();

        assert_eq!(metrics.months_remaining, MonthsRemaining::Finite(dec("0.25")));
        assert_eq!(metrics.urgency, UrgencyBucket::Critical);
        assert_eq!(metrics.shortfall_units, dec("55"));
        assert_eq!(metrics.recommended_purchase_qty, dec("75"));
        assert_eq!(metrics.moq_multiples, dec("3"));
        assert_eq!(metrics.recommended_investment, dec("300"));
        assert_eq!(metrics.order_volume_cbm, dec("1.5"));
    }

    #[test]
    fn test_zero_sales_is_unbounded_ok() {
        let item = record(dec("0"), Decimal::ZERO, Decimal::ZERO, 10, dec("1"));
        let metrics = analyze_item(&item, &ctx("6")).unwrap();

        assert!(metrics.months_remaining.is_unbounded());
        assert_eq!(metrics.urgency, UrgencyBucket::Ok);
        assert_eq!(metrics.recommended_purchase_qty, Decimal::ZERO);
        assert_eq!(metrics.days_remaining, None);
        assert_eq!(metrics.runout_date, None);
    }

    #[test]
    fn test_runout_and_order_by_dates() {
        // 2 months = 60 days; 45-day lead time
        let item = record(dec("40"), Decimal::ZERO, dec("20"), 1, dec("1"));
        let metrics = analyze_item(&item, &ctx("6")).unwrap();

        assert_eq!(metrics.days_remaining, Some(60));
        assert_eq!(metrics.runout_date, NaiveDate::from_ymd_opt(2024, 4, 30));
        assert_eq!(metrics.order_by_date, NaiveDate::from_ymd_opt(2024, 3, 16));
    }

    #[test]
    fn test_order_by_never_before_reference_date() {
        let item = record(dec("10"), Decimal::ZERO, dec("20"), 1, dec("1"));
        let metrics = analyze_item(&item, &ctx("6")).unwrap();

        assert_eq!(metrics.days_remaining, Some(15));
        assert_eq!(metrics.order_by_date, Some(reference_date()));
    }

    #[test]
    fn test_fractional_target_months() {
        let item = record(dec("10"), Decimal::ZERO, dec("30"), 4, dec("1"));
        // Needs 1.5 × 30 = 45 units, has 10: short 35, buy 36
        let metrics = analyze_item(&item, &ctx("1.5")).unwrap();
        assert_eq!(metrics.shortfall_units, dec("35"));
        assert_eq!(metrics.recommended_purchase_qty, dec("36"));
    }

    #[test]
    fn test_report_sorted_with_unbounded_last() {
        let items = vec![
            record(dec("100"), Decimal::ZERO, Decimal::ZERO, 1, dec("1")),
            record(dec("90"), Decimal::ZERO, dec("10"), 1, dec("1")),
            record(dec("5"), Decimal::ZERO, dec("10"), 1, dec("1")),
        ];
        let report = analyze(&items, &ctx("6")).unwrap();

        let months: Vec<MonthsRemaining> =
            report.items.iter().map(|m| m.months_remaining).collect();
        assert_eq!(
            months,
            vec![
                MonthsRemaining::Finite(dec("0.5")),
                MonthsRemaining::Finite(dec("9")),
                MonthsRemaining::Unbounded,
            ]
        );
        assert_eq!(report.bucket_counts.critical, 1);
        assert_eq!(report.bucket_counts.ok, 2);
    }

    /// Values beyond `Decimal` range surface as errors naming the item
    #[test]
    fn test_overflowing_item_is_an_error() {
        let item = record(Decimal::MAX, Decimal::MAX, dec("1"), 1, dec("1"));
        assert_eq!(
            analyze_item(&item, &ctx("6")),
            Err(PlanningError::ItemOverflow {
                item_code: "ITEM001".to_string(),
                metric: "available stock"
            })
        );

        let item = record(dec("1000"), Decimal::ZERO, dec("0.0000000000000000000000000001"), 1, dec("1"));
        assert!(analyze(&[item], &ctx("6")).is_err());

        let target_max = AnalysisContext::new(Decimal::MAX, reference_date());
        assert!(target_max.is_err());
    }

    #[test]
    fn test_empty_dataset() {
        let report = analyze(&[], &ctx("6")).unwrap();
        assert_eq!(report.item_count, 0);
        assert_eq!(report.total_investment, Decimal::ZERO);
        assert!(report.items.is_empty());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..1_000_000).prop_map(|v| Decimal::new(v, 2))
    }

    fn sales_strategy() -> impl Strategy<Value = Decimal> {
        prop_oneof![
            1 => Just(Decimal::ZERO),
            4 => (1i64..100_000).prop_map(|v| Decimal::new(v, 2)),
        ]
    }

    fn any_decimal() -> impl Strategy<Value = Decimal> {
        (any::<u32>(), any::<u32>(), any::<u32>(), 0u32..=28)
            .prop_map(|(lo, mid, hi, scale)| Decimal::from_parts(lo, mid, hi, false, scale))
    }

    fn target_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=240).prop_map(|v| Decimal::new(v, 1))
    }

    fn record_strategy() -> impl Strategy<Value = ItemRecord> {
        (
            quantity_strategy(),
            quantity_strategy(),
            sales_strategy(),
            1u32..500,
            (0i64..100_000).prop_map(|v| Decimal::new(v, 2)),
        )
            .prop_map(|(stock, in_transit, sales, moq, price)| {
                record(stock, in_transit, sales, moq, price)
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Zero sales means unbounded runout, OK urgency and no purchase
        #[test]
        fn prop_zero_sales_never_orders(
            stock in quantity_strategy(),
            in_transit in quantity_strategy(),
            moq in 1u32..500,
            target in target_strategy()
        ) {
            let item = record(stock, in_transit, Decimal::ZERO, moq, dec("3"));
            let ctx = AnalysisContext::new(target, reference_date()).unwrap();
            let metrics = analyze_item(&item, &ctx).unwrap();

            prop_assert!(metrics.months_remaining.is_unbounded());
            prop_assert_eq!(metrics.urgency, UrgencyBucket::Ok);
            prop_assert_eq!(metrics.recommended_purchase_qty, Decimal::ZERO);
        }

        /// Purchase quantity is always a whole multiple of the MOQ
        #[test]
        fn prop_purchase_is_moq_multiple(item in record_strategy(), target in target_strategy()) {
            let ctx = AnalysisContext::new(target, reference_date()).unwrap();
            let metrics = analyze_item(&item, &ctx).unwrap();
            let moq = Decimal::from(item.moq);

            prop_assert_eq!(metrics.recommended_purchase_qty % moq, Decimal::ZERO);
            prop_assert_eq!(metrics.moq_multiples * moq, metrics.recommended_purchase_qty);
        }

        /// Items already covered for the target never order
        #[test]
        fn prop_covered_items_never_order(item in record_strategy(), target in target_strategy()) {
            let ctx = AnalysisContext::new(target, reference_date()).unwrap();
            let months = runout::months_remaining(&item).unwrap();
            let metrics = analyze_item(&item, &ctx).unwrap();

            if !months.is_below(target) {
                prop_assert_eq!(metrics.recommended_purchase_qty, Decimal::ZERO);
            }
        }

        /// An order covers the shortfall with less than one MOQ to spare
        #[test]
        fn prop_purchase_covers_shortfall(item in record_strategy(), target in target_strategy()) {
            let ctx = AnalysisContext::new(target, reference_date()).unwrap();
            let metrics = analyze_item(&item, &ctx).unwrap();

            if metrics.needs_order() {
                let moq = Decimal::from(item.moq);
                prop_assert!(metrics.recommended_purchase_qty >= metrics.shortfall_units);
                prop_assert!(metrics.recommended_purchase_qty - metrics.shortfall_units < moq);
                prop_assert!(
                    item.available_stock().unwrap() + metrics.recommended_purchase_qty
                        >= target * item.avg_monthly_sales
                );
            }
        }

        /// Any non-negative magnitude either analyzes or fails with an error
        #[test]
        fn prop_extreme_values_never_panic(
            stock in any_decimal(),
            in_transit in any_decimal(),
            sales in any_decimal(),
            price in any_decimal(),
            moq in 1u32..=u32::MAX,
            target in target_strategy()
        ) {
            let item = record(stock, in_transit, sales, moq, price);
            let ctx = AnalysisContext::new(target, reference_date()).unwrap();
            if let Ok(metrics) = analyze_item(&item, &ctx) {
                prop_assert_eq!(
                    metrics.recommended_purchase_qty % Decimal::from(item.moq),
                    Decimal::ZERO
                );
            }
        }

        /// Urgency is monotonic in months remaining
        #[test]
        fn prop_urgency_monotonic(a in 0i64..1000, b in 0i64..1000) {
            let (low, high) = (a.min(b), a.max(b));
            let low_bucket = urgency::classify(MonthsRemaining::Finite(Decimal::new(low, 1)));
            let high_bucket = urgency::classify(MonthsRemaining::Finite(Decimal::new(high, 1)));
            prop_assert!(low_bucket <= high_bucket);
        }

        /// MOQ rounding is the smallest multiple not below the units
        #[test]
        fn prop_round_up_to_moq(units in 1i64..100_000, moq_units in 1u32..1000) {
            let units = Decimal::from(units);
            let rounded = moq::round_up_to_moq(units, moq_units).unwrap();
            let moq_dec = Decimal::from(moq_units);

            prop_assert!(rounded >= units);
            prop_assert!(rounded - units < moq_dec);
            prop_assert_eq!(rounded % moq_dec, Decimal::ZERO);
        }

        /// Same input and context, same report
        #[test]
        fn prop_analysis_is_idempotent(
            items in prop::collection::vec(record_strategy(), 0..20),
            target in target_strategy()
        ) {
            let ctx = AnalysisContext::new(target, reference_date()).unwrap();
            prop_assert_eq!(analyze(&items, &ctx), analyze(&items, &ctx));
        }

        /// Totals and bucket counts agree with the listed items
        #[test]
        fn prop_report_totals_consistent(
            items in prop::collection::vec(record_strategy(), 0..20),
            target in target_strategy()
        ) {
            let ctx = AnalysisContext::new(target, reference_date()).unwrap();
            let report = analyze(&items, &ctx).unwrap();

            prop_assert_eq!(report.item_count, items.len());
            prop_assert_eq!(report.bucket_counts.total(), report.item_count);

            let investment: Decimal = report.items.iter().map(|m| m.recommended_investment).sum();
            prop_assert_eq!(report.total_investment, investment);

            let ordered = report.items.iter().filter(|m| m.needs_order()).count();
            prop_assert_eq!(report.items_to_order, ordered);

            for pair in report.items.windows(2) {
                prop_assert!(pair[0].months_remaining <= pair[1].months_remaining);
            }
        }
    }
}
