//! Validation utilities for the Replenishment Dashboard
//!
//! Field-level parsing used by the row normalizer, plus the checks applied to
//! analysis parameters.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::columns::Column;
use crate::error::{ConfigurationError, ValidationError};

/// Largest value accepted in any numeric cell
pub const MAX_CELL_VALUE: i64 = 10_000_000_000;

/// Smallest non-zero average monthly sales, in millionths of a unit
pub const MIN_SALES_MICROS: i64 = 1;

/// Longest coverage target, in months
pub const MAX_TARGET_MONTHS: u32 = 120;

// ============================================================================
// Numeric Parsing
// ============================================================================

/// Parse a spreadsheet cell as a decimal number.
///
/// Accepts surrounding whitespace, `,` thousands separators (groups of exactly
/// three digits) and scientific notation. Returns `None` for anything else,
/// including an empty cell.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let cleaned = strip_thousands_separators(trimmed)?;
    Decimal::from_str(&cleaned)
        .ok()
        .or_else(|| Decimal::from_scientific(&cleaned).ok())
}

fn strip_thousands_separators(value: &str) -> Option<String> {
    if !value.contains(',') {
        return Some(value.to_string());
    }

    let (integer_part, rest) = match value.find('.') {
        Some(dot) => value.split_at(dot),
        None => (value, ""),
    };
    let groups: Vec<&str> = integer_part.split(',').collect();
    let leading = groups[0].trim_start_matches(['-', '+']);
    if leading.is_empty() || leading.len() > 3 {
        return None;
    }
    if !groups[1..]
        .iter()
        .all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    Some(format!("{}{}", groups.concat(), rest))
}

// ============================================================================
// Row Field Validations
// ============================================================================

/// Parse a required non-negative numeric cell, at most [`MAX_CELL_VALUE`]
pub fn validate_non_negative(
    raw: &str,
    row: usize,
    column: Column,
) -> Result<Decimal, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingValue { row, column });
    }

    let value = parse_decimal(raw).ok_or_else(|| ValidationError::NotNumeric {
        row,
        column,
        value: raw.to_string(),
    })?;

    if value < Decimal::ZERO {
        return Err(ValidationError::Negative { row, column, value });
    }
    if value > Decimal::from(MAX_CELL_VALUE) {
        return Err(ValidationError::OutOfRange { row, column, value });
    }
    Ok(value)
}

/// Parse the average monthly sales cell.
///
/// Zero means no consumption; any other value must be at least one
/// millionth of a unit so months remaining stays representable.
pub fn validate_average_sales(raw: &str, row: usize) -> Result<Decimal, ValidationError> {
    let value = validate_non_negative(raw, row, Column::AverageSales)?;
    if value > Decimal::ZERO && value < Decimal::new(MIN_SALES_MICROS, 6) {
        return Err(ValidationError::OutOfRange {
            row,
            column: Column::AverageSales,
            value,
        });
    }
    Ok(value)
}

/// Parse the MOQ cell, which must be a positive whole number.
///
/// `12.0` is accepted as 12 since spreadsheet readers hand back floats.
pub fn validate_moq(raw: &str, row: usize) -> Result<u32, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingValue {
            row,
            column: Column::Moq,
        });
    }

    let value = parse_decimal(raw).ok_or_else(|| ValidationError::NotNumeric {
        row,
        column: Column::Moq,
        value: raw.to_string(),
    })?;

    let invalid = || ValidationError::InvalidMoq {
        row,
        value: raw.to_string(),
    };
    if value <= Decimal::ZERO || !value.fract().is_zero() {
        return Err(invalid());
    }
    value.to_u32().ok_or_else(invalid)
}

/// Require a non-empty text cell
pub fn validate_required_text(
    raw: &str,
    row: usize,
    column: Column,
) -> Result<String, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingValue { row, column });
    }
    Ok(value.to_string())
}

// ============================================================================
// Analysis Parameter Validations
// ============================================================================

/// Validate the desired months of coverage: above zero, at most [`MAX_TARGET_MONTHS`]
pub fn validate_target_months(target_months: Decimal) -> Result<(), ConfigurationError> {
    if target_months <= Decimal::ZERO {
        return Err(ConfigurationError::TargetMonthsNotPositive(target_months));
    }
    if target_months > Decimal::from(MAX_TARGET_MONTHS) {
        return Err(ConfigurationError::TargetMonthsTooLarge {
            value: target_months,
            max: MAX_TARGET_MONTHS,
        });
    }
    Ok(())
}
