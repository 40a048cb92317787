//! Urgency classifier

use rust_decimal::Decimal;

use crate::models::{MonthsRemaining, UrgencyBucket};

/// Below this many months an item is critical
pub const CRITICAL_BELOW_MONTHS: u32 = 1;
/// Below this many months an item needs a medium-urgency order
pub const MEDIUM_BELOW_MONTHS: u32 = 3;
/// Below this many months an item needs attention
pub const ATTENTION_BELOW_MONTHS: u32 = 6;

/// Bucket an item by months remaining.
///
/// Cut points are fixed and do not follow the target coverage.
pub fn classify(months: MonthsRemaining) -> UrgencyBucket {
    if months.is_below(Decimal::from(CRITICAL_BELOW_MONTHS)) {
        UrgencyBucket::Critical
    } else if months.is_below(Decimal::from(MEDIUM_BELOW_MONTHS)) {
        UrgencyBucket::Medium
    } else if months.is_below(Decimal::from(ATTENTION_BELOW_MONTHS)) {
        UrgencyBucket::Attention
    } else {
        UrgencyBucket::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn months(s: &str) -> MonthsRemaining {
        MonthsRemaining::Finite(s.parse().unwrap())
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(months("0")), UrgencyBucket::Critical);
        assert_eq!(classify(months("0.99")), UrgencyBucket::Critical);
        assert_eq!(classify(months("1")), UrgencyBucket::Medium);
        assert_eq!(classify(months("2.99")), UrgencyBucket::Medium);
        assert_eq!(classify(months("3")), UrgencyBucket::Attention);
        assert_eq!(classify(months("5.99")), UrgencyBucket::Attention);
        assert_eq!(classify(months("6")), UrgencyBucket::Ok);
        assert_eq!(classify(months("120")), UrgencyBucket::Ok);
    }

    #[test]
    fn test_classify_unbounded_is_ok() {
        assert_eq!(classify(MonthsRemaining::Unbounded), UrgencyBucket::Ok);
    }
}
