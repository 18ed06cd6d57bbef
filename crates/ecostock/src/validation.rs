//! Form validation rules.
//!
//! Every create and update goes through these checks before reaching the
//! store. Text checks return the trimmed value so callers store clean data.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{Error, Result};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Minimum number of digits in a phone number.
const MIN_PHONE_DIGITS: usize = 7;

/// Largest quantity a single form field may carry.
pub const MAX_QUANTITY: i64 = 1_000_000_000_000;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("Invalid regex pattern"))
}

/// Require a non-blank text field.
///
/// # Errors
///
/// Returns a validation error if the value is empty after trimming.
pub fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, "is required"));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field, treating blank as absent.
#[must_use]
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Require a number that is zero or more.
///
/// # Errors
///
/// Returns a validation error for negative values or values above
/// [`MAX_QUANTITY`].
pub fn non_negative(field: &'static str, value: i64) -> Result<i64> {
    if value < 0 {
        return Err(Error::validation(field, "cannot be negative"));
    }
    at_most_max(field, value)
}

/// Require a number that is strictly greater than zero.
///
/// # Errors
///
/// Returns a validation error for zero or negative values, or values above
/// [`MAX_QUANTITY`].
pub fn positive(field: &'static str, value: i64) -> Result<i64> {
    if value <= 0 {
        return Err(Error::validation(field, "must be greater than 0"));
    }
    at_most_max(field, value)
}

fn at_most_max(field: &'static str, value: i64) -> Result<i64> {
    if value > MAX_QUANTITY {
        return Err(Error::validation(
            field,
            format!("cannot be greater than {MAX_QUANTITY}"),
        ));
    }
    Ok(value)
}

/// Require an optional amount to be zero or more when present.
///
/// # Errors
///
/// Returns a validation error for negative amounts.
pub fn non_negative_amount(field: &'static str, value: Option<Decimal>) -> Result<Option<Decimal>> {
    match value {
        Some(amount) if amount.is_sign_negative() && !amount.is_zero() => {
            Err(Error::validation(field, "cannot be negative"))
        }
        other => Ok(other),
    }
}

/// Require a well-formed email address.
///
/// # Errors
///
/// Returns a validation error if the value is blank or malformed.
pub fn email(field: &'static str, value: &str) -> Result<String> {
    let trimmed = required(field, value)?;
    if !email_regex().is_match(&trimmed) {
        return Err(Error::validation(field, "must be a valid email address"));
    }
    Ok(trimmed)
}

/// Require a plausible phone number.
///
/// Digits, spaces, `+`, `-` and parentheses are accepted.
///
/// # Errors
///
/// Returns a validation error for blank values, unexpected characters, or
/// too few digits.
pub fn phone(field: &'static str, value: &str) -> Result<String> {
    let trimmed = required(field, value)?;
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')');
    if !trimmed.chars().all(allowed) {
        return Err(Error::validation(field, "may only contain digits, spaces, +, - and parentheses"));
    }
    let digits = trimmed.chars().filter(char::is_ascii_digit).count();
    if digits < MIN_PHONE_DIGITS {
        return Err(Error::validation(
            field,
            format!("must contain at least {MIN_PHONE_DIGITS} digits"),
        ));
    }
    Ok(trimmed)
}

/// Require a date that is not after `today`.
///
/// # Errors
///
/// Returns a validation error for future dates.
pub fn not_in_future(field: &'static str, date: NaiveDate, today: NaiveDate) -> Result<NaiveDate> {
    if date > today {
        return Err(Error::validation(field, "cannot be in the future"));
    }
    Ok(date)
}

/// Compare two text values ignoring surrounding whitespace and case.
#[must_use]
pub fn same_text(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Require `value` to be unique among `existing` records.
///
/// `existing` yields `(id, value)` pairs. The record being edited, if any,
/// is skipped so saving it unchanged is allowed.
///
/// # Errors
///
/// Returns a duplicate error naming the clashing value.
pub fn ensure_unique<'a, I>(
    entity: &'static str,
    field: &'static str,
    value: &str,
    existing: I,
    editing: Option<i64>,
) -> Result<()>
where
    I: IntoIterator<Item = (i64, &'a str)>,
{
    let clash = existing
        .into_iter()
        .filter(|(id, _)| Some(*id) != editing)
        .any(|(_, other)| same_text(other, value));

    if clash {
        return Err(Error::duplicate(entity, field, value.trim()));
    }
    Ok(())
}
