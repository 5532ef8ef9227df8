// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DeliveryStatus, DomainError, Username, validate_delivery_fields, validate_initial_status,
    validate_tenant_name, validate_username,
};

#[test]
fn test_valid_usernames() {
    for name in ["interadmin00", "joao.silva", "ana_m", "abc", "x-y-z"] {
        assert!(
            validate_username(&Username::new(name)).is_ok(),
            "{name} should be valid"
        );
    }
}

#[test]
fn test_username_length_limits() {
    assert!(matches!(
        validate_username(&Username::new("ab")),
        Err(DomainError::InvalidUsername(_))
    ));
    let long: String = "a".repeat(33);
    assert!(validate_username(&Username::new(&long)).is_err());
}

#[test]
fn test_username_rejects_spaces_and_symbols() {
    assert!(validate_username(&Username::new("joao silva")).is_err());
    assert!(validate_username(&Username::new("joao@silva")).is_err());
}

#[test]
fn test_delivery_fields_require_client_and_address() {
    assert!(validate_delivery_fields("Acme", "Rua A, 1", None).is_ok());

    assert!(matches!(
        validate_delivery_fields("   ", "Rua A, 1", None),
        Err(DomainError::InvalidClientName(_))
    ));
    assert!(matches!(
        validate_delivery_fields("Acme", "", None),
        Err(DomainError::InvalidAddress(_))
    ));
}

#[test]
fn test_delivery_fields_check_email_shape() {
    assert!(validate_delivery_fields("Acme", "Rua A", Some("compras@acme.pt")).is_ok());
    assert!(matches!(
        validate_delivery_fields("Acme", "Rua A", Some("compras.acme.pt")),
        Err(DomainError::InvalidEmail(_))
    ));
    assert!(validate_delivery_fields("Acme", "Rua A", Some("@acme.pt")).is_err());
    assert!(validate_delivery_fields("Acme", "Rua A", Some("compras@")).is_err());
}

#[test]
fn test_delivery_email_needs_no_dotted_domain() {
    assert!(validate_delivery_fields("Acme", "Rua A", Some("ana@localhost")).is_ok());
    assert!(validate_delivery_fields("Acme", "Rua A", Some(" ana@intranet ")).is_ok());
}

#[test]
fn test_closed_is_not_an_initial_status() {
    assert!(validate_initial_status(DeliveryStatus::Pending).is_ok());
    assert!(validate_initial_status(DeliveryStatus::Delivered).is_ok());
    assert!(matches!(
        validate_initial_status(DeliveryStatus::Closed),
        Err(DomainError::InvalidInitialStatus(_))
    ));
}

#[test]
fn test_tenant_name_cannot_be_blank() {
    assert!(validate_tenant_name("Empresa Demo").is_ok());
    assert!(validate_tenant_name("  ").is_err());
}
