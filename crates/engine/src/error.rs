//! The module contains the errors the engine can return.
//!
//! Validation failures are raised before anything reaches the database or
//! the aggregation functions:
//!
//! - [`InvalidCategory`] / [`InvalidMethod`] for values outside the fixed
//!   enumerations, including rows already stored with such values.
//! - [`InvalidAmount`] for zero transaction amounts, negative budgets,
//!   non-positive incomes and amounts above [`MAX_AMOUNT_MINOR`]. Aggregated
//!   totals that would overflow report it as well.
//! - [`KeyNotFound`] / [`Forbidden`] for missing or foreign records.
//!
//!  [`InvalidCategory`]: EngineError::InvalidCategory
//!  [`InvalidMethod`]: EngineError::InvalidMethod
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`MAX_AMOUNT_MINOR`]: crate::MAX_AMOUNT_MINOR
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid category: {0}")]
    InvalidCategory(String),
    #[error("Invalid payment method: {0}")]
    InvalidMethod(String),
    #[error("Invalid month: {0}")]
    InvalidMonth(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns `true` for errors caused by the caller's input rather than by
    /// storage or ownership.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::InvalidCategory(_)
                | Self::InvalidMethod(_)
                | Self::InvalidMonth(_)
                | Self::InvalidDate(_)
                | Self::InvalidInput(_)
                | Self::InvalidId(_)
        )
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidCategory(a), Self::InvalidCategory(b)) => a == b,
            (Self::InvalidMethod(a), Self::InvalidMethod(b)) => a == b,
            (Self::InvalidMonth(a), Self::InvalidMonth(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
