// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{DeliveryStatus, Username};

/// Minimum username length.
const USERNAME_MIN_LENGTH: usize = 3;

/// Maximum username length.
const USERNAME_MAX_LENGTH: usize = 32;

/// Validates the shape of a username.
///
/// Usernames are already case-folded by [`Username::new`]. This checks
/// the length and character set only; uniqueness requires the store.
///
/// # Errors
///
/// Returns an error if:
/// - The username is shorter than 3 or longer than 32 characters
/// - The username contains characters other than `a-z`, `0-9`, `.`, `_` or `-`
pub fn validate_username(username: &Username) -> Result<(), DomainError> {
    let value: &str = username.value();
    let length: usize = value.chars().count();

    if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&length) {
        return Err(DomainError::InvalidUsername(format!(
            "must be between {USERNAME_MIN_LENGTH} and {USERNAME_MAX_LENGTH} characters"
        )));
    }

    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(*c, '.' | '_' | '-')))
    {
        return Err(DomainError::InvalidUsername(format!(
            "character '{bad}' is not allowed"
        )));
    }

    Ok(())
}

/// Validates the text fields of a new delivery record.
///
/// # Arguments
///
/// * `client_name` - The client name (required)
/// * `address` - The delivery address (required)
/// * `client_email` - The optional client email
///
/// # Errors
///
/// Returns an error if:
/// - The client name is empty after trimming
/// - The address is empty after trimming
/// - The email is present but has no `@`, or nothing before or after it
pub fn validate_delivery_fields(
    client_name: &str,
    address: &str,
    client_email: Option<&str>,
) -> Result<(), DomainError> {
    if client_name.trim().is_empty() {
        return Err(DomainError::InvalidClientName(String::from(
            "Client name cannot be empty",
        )));
    }

    if address.trim().is_empty() {
        return Err(DomainError::InvalidAddress(String::from(
            "Address cannot be empty",
        )));
    }

    if let Some(email) = client_email {
        let well_formed: bool = email
            .trim()
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
        if !well_formed {
            return Err(DomainError::InvalidEmail(email.to_string()));
        }
    }

    Ok(())
}

/// Validates that a delivery may be created in the given status.
///
/// # Errors
///
/// Returns an error if the status is terminal.
pub fn validate_initial_status(status: DeliveryStatus) -> Result<(), DomainError> {
    if status.is_terminal() {
        return Err(DomainError::InvalidInitialStatus(status.to_string()));
    }
    Ok(())
}

/// Validates a tenant (company) name.
///
/// # Errors
///
/// Returns an error if the name is empty after trimming.
pub fn validate_tenant_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidTenantName(String::from(
            "Company name cannot be empty",
        )));
    }
    Ok(())
}
