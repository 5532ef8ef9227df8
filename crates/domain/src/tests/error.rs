// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidUsername(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid username: test");

    let err: DomainError = DomainError::InvalidRole(String::from("chef"));
    assert_eq!(
        format!("{err}"),
        "Invalid role: 'chef'. Must be 'admin' or 'entregador'"
    );

    let err: DomainError = DomainError::InvalidStatus(String::from("Lost"));
    assert_eq!(format!("{err}"), "Invalid delivery status: 'Lost'");

    let err: DomainError = DomainError::InvalidInitialStatus(String::from("Closed"));
    assert_eq!(
        format!("{err}"),
        "A delivery cannot be created with status 'Closed'"
    );

    let err: DomainError = DomainError::InvalidClientName(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid client name: test");

    let err: DomainError = DomainError::InvalidAddress(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid address: test");

    let err: DomainError = DomainError::InvalidEmail(String::from("nope"));
    assert_eq!(format!("{err}"), "Invalid email: nope");

    let err: DomainError = DomainError::InvalidTenantName(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid company name: test");

    let err: DomainError = DomainError::DateParseError {
        date_string: String::from("2026-13-01"),
        error: String::from("bad month"),
    };
    assert_eq!(
        format!("{err}"),
        "Failed to parse date '2026-13-01': bad month"
    );
}
