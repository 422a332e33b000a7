//! Internal helpers for input validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so every write path enforces the same
//! invariants.

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

pub(crate) const MAX_DESCRIPTION_CHARS: usize = 200;

/// Trim a description and enforce `1..=200` characters.
pub(crate) fn normalize_description(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(
            "description must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(EngineError::InvalidInput(format!(
            "description must be at most {MAX_DESCRIPTION_CHARS} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Blank text collapses to `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Largest accepted amount, in minor units, for a transaction, budget or
/// declaration.
pub const MAX_AMOUNT_MINOR: i64 = 1_000_000_000_000;

fn amount_too_large() -> EngineError {
    EngineError::InvalidAmount(format!(
        "amount too large (max {MAX_AMOUNT_MINOR} minor units)"
    ))
}

/// Reject magnitudes above [`MAX_AMOUNT_MINOR`].
pub(crate) fn bounded_amount(amount_minor: i64) -> ResultEngine<i64> {
    if amount_minor.checked_abs().is_none_or(|abs| abs > MAX_AMOUNT_MINOR) {
        return Err(amount_too_large());
    }
    Ok(amount_minor)
}

/// Expenses are stored as negative amounts whatever sign the caller used.
pub(crate) fn expense_amount(amount_minor: i64) -> ResultEngine<i64> {
    if amount_minor == 0 {
        return Err(EngineError::InvalidAmount(
            "amount_minor must not be 0".to_string(),
        ));
    }
    Ok(-bounded_amount(amount_minor)?.abs())
}

pub(crate) fn add_minor(lhs: i64, rhs: i64) -> ResultEngine<i64> {
    lhs.checked_add(rhs).ok_or_else(amount_too_large)
}

pub(crate) fn sub_minor(lhs: i64, rhs: i64) -> ResultEngine<i64> {
    lhs.checked_sub(rhs).ok_or_else(amount_too_large)
}

/// Checked sum of money amounts.
pub(crate) fn sum_minor(amounts: impl IntoIterator<Item = i64>) -> ResultEngine<i64> {
    amounts.into_iter().try_fold(0, add_minor)
}

pub(crate) const LIKE_ESCAPE: char = '!';

/// Make `%`, `_` and the escape character match literally in a `LIKE`
/// pattern using [`LIKE_ESCAPE`].
pub(crate) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}
