//! Error types raised by the purchasing calculations

use rust_decimal::Decimal;
use thiserror::Error;

use crate::columns::Column;

/// A malformed or out-of-range input row.
///
/// Row numbers are 1-based positions among the data rows (the header row is
/// not counted).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("required column '{column}' not found in header row")]
    MissingColumn { column: Column },

    #[error("row {row}: column '{column}' is empty")]
    MissingValue { row: usize, column: Column },

    #[error("row {row}: column '{column}' has non-numeric value '{value}'")]
    NotNumeric {
        row: usize,
        column: Column,
        value: String,
    },

    #[error("row {row}: column '{column}' must not be negative (got {value})")]
    Negative {
        row: usize,
        column: Column,
        value: Decimal,
    },

    #[error("row {row}: MOQ must be a positive whole number (got {value})")]
    InvalidMoq { row: usize, value: String },

    #[error("row {row}: column '{column}' is outside the supported range (got {value})")]
    OutOfRange {
        row: usize,
        column: Column,
        value: Decimal,
    },
}

impl ValidationError {
    /// The offending data row, if the error is row-specific
    pub fn row(&self) -> Option<usize> {
        match self {
            ValidationError::MissingColumn { .. } => None,
            ValidationError::MissingValue { row, .. }
            | ValidationError::NotNumeric { row, .. }
            | ValidationError::Negative { row, .. }
            | ValidationError::InvalidMoq { row, .. }
            | ValidationError::OutOfRange { row, .. } => Some(*row),
        }
    }

    /// The offending column
    pub fn column(&self) -> Column {
        match self {
            ValidationError::MissingColumn { column }
            | ValidationError::MissingValue { column, .. }
            | ValidationError::NotNumeric { column, .. }
            | ValidationError::Negative { column, .. }
            | ValidationError::OutOfRange { column, .. } => *column,
            ValidationError::InvalidMoq { .. } => Column::Moq,
        }
    }
}

/// Invalid analysis parameters, rejected before any computation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("target months must be greater than zero (got {0})")]
    TargetMonthsNotPositive(Decimal),

    #[error("target months must be at most {max} (got {value})")]
    TargetMonthsTooLarge { value: Decimal, max: u32 },
}

impl ConfigurationError {
    /// Name of the rejected analysis parameter
    pub fn field(&self) -> &'static str {
        match self {
            ConfigurationError::TargetMonthsNotPositive(_)
            | ConfigurationError::TargetMonthsTooLarge { .. } => "target_months",
        }
    }
}

/// Any failure of a full planning pass
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanningError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("item '{item_code}': {metric} is not representable")]
    ItemOverflow {
        item_code: String,
        metric: &'static str,
    },

    #[error("report {metric} is not representable")]
    TotalOverflow { metric: &'static str },
}
