// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod initialization_tests;

use entregas_domain::{DeliveryStatus, Role, Username};

use crate::{NewDelivery, Persistence};

/// Creates an isolated in-memory store with a cheap bcrypt cost.
pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory()
        .expect("in-memory database")
        .with_bcrypt_cost(4)
}

/// Creates a tenant and returns its id.
pub fn create_test_tenant(persistence: &mut Persistence, name: &str) -> i64 {
    persistence.ensure_tenant(name).unwrap().tenant_id
}

/// Creates a user and returns its id.
pub fn create_test_user(
    persistence: &mut Persistence,
    tenant_id: i64,
    username: &str,
    role: Role,
) -> i64 {
    persistence
        .create_user(
            tenant_id,
            &Username::new(username),
            "Senha-forte1",
            role,
            None,
        )
        .unwrap()
}

/// Builds a pending delivery authored by `username` at `created_at`.
pub fn sample_delivery(
    tenant_id: i64,
    user_id: i64,
    username: &str,
    created_at: &str,
) -> NewDelivery {
    NewDelivery {
        tenant_id,
        user_id,
        entregador: username.to_string(),
        client_name: String::from("Maria Silva"),
        address: String::from("Rua das Flores, 12"),
        client_email: Some(String::from("maria@example.com")),
        client_phone: None,
        status: DeliveryStatus::Pending,
        note: String::new(),
        tracking_code: Some(String::from("ENT-0000ABCD")),
        photo: None,
        signature: None,
        created_at: created_at.to_string(),
    }
}
