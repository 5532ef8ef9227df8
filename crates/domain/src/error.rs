// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Username is empty or contains characters outside the allowed set.
    InvalidUsername(String),
    /// Role is not one of the known roles.
    InvalidRole(String),
    /// Delivery status is not part of the status vocabulary.
    InvalidStatus(String),
    /// A delivery cannot start in the given status.
    InvalidInitialStatus(String),
    /// Client name is empty or invalid.
    InvalidClientName(String),
    /// Delivery address is empty or invalid.
    InvalidAddress(String),
    /// Client email is malformed.
    InvalidEmail(String),
    /// Tenant name is empty or invalid.
    InvalidTenantName(String),
    /// Failed to parse a date or timestamp.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Failed to format a timestamp.
    TimestampFormatError(String),
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUsername(msg) => write!(f, "Invalid username: {msg}"),
            Self::InvalidRole(role) => {
                write!(f, "Invalid role: '{role}'. Must be 'admin' or 'entregador'")
            }
            Self::InvalidStatus(status) => write!(f, "Invalid delivery status: '{status}'"),
            Self::InvalidInitialStatus(status) => {
                write!(f, "A delivery cannot be created with status '{status}'")
            }
            Self::InvalidClientName(msg) => write!(f, "Invalid client name: {msg}"),
            Self::InvalidAddress(msg) => write!(f, "Invalid address: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidTenantName(msg) => write!(f, "Invalid company name: {msg}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::TimestampFormatError(msg) => write!(f, "Failed to format timestamp: {msg}"),
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
