// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Timestamp and day formatting.
//!
//! Timestamps are stored as UTC text in the same layout `SQLite` uses for
//! `CURRENT_TIMESTAMP`, so ordering the text orders the instants.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::DomainError;

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

const DAY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Formats an instant as a UTC storage timestamp.
///
/// # Errors
///
/// Returns an error if the instant cannot be formatted.
pub fn format_timestamp(instant: OffsetDateTime) -> Result<String, DomainError> {
    instant
        .to_offset(UtcOffset::UTC)
        .format(TIMESTAMP_FORMAT)
        .map_err(|e| DomainError::TimestampFormatError(e.to_string()))
}

/// Parses a storage timestamp back into a UTC instant.
///
/// # Errors
///
/// Returns an error if the text is not a storage timestamp.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, DomainError> {
    PrimitiveDateTime::parse(value, TIMESTAMP_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| DomainError::DateParseError {
            date_string: value.to_string(),
            error: e.to_string(),
        })
}

/// Parses a `YYYY-MM-DD` calendar day.
///
/// # Errors
///
/// Returns an error if the text is not a valid calendar day.
pub fn parse_day(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), DAY_FORMAT).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a calendar day as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns an error if the day cannot be formatted.
pub fn format_day(day: Date) -> Result<String, DomainError> {
    day.format(DAY_FORMAT)
        .map_err(|e| DomainError::TimestampFormatError(e.to_string()))
}

/// Returns the half-open storage-timestamp range `[start, end)` covering a UTC day.
///
/// # Errors
///
/// Returns an error if the day is the last representable date.
pub fn day_bounds(day: Date) -> Result<(String, String), DomainError> {
    let next: Date = day
        .next_day()
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("computing the day after {day}"),
        })?;

    let start: String = format_timestamp(day.midnight().assume_utc())?;
    let end: String = format_timestamp(next.midnight().assume_utc())?;
    Ok((start, end))
}
