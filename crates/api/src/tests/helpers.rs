// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::Mutex;

use entregas_domain::{Role, Username};
use entregas_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    AuthSettings, AuthenticationService, CreateDeliveryRequest, DeliveryNotifier, DeliveryRecord,
    NotifyError, SessionContext, bootstrap_defaults,
};

/// Password used for every fixture account.
pub const TEST_PASSWORD: &str = "Senha-forte1";

/// A fixed instant: 2026-03-01 10:00 UTC.
pub const fn test_now() -> OffsetDateTime {
    datetime!(2026-03-01 10:00 UTC)
}

/// A bootstrapped in-memory store with a cheap bcrypt cost.
pub fn create_test_persistence() -> Persistence {
    let mut persistence = Persistence::new_in_memory().unwrap().with_bcrypt_cost(4);
    bootstrap_defaults(&mut persistence, &AuthSettings::default()).unwrap();
    persistence
}

/// Creates an account in the named tenant and returns its session context.
pub fn create_account(
    persistence: &mut Persistence,
    tenant: &str,
    username: &str,
    role: Role,
) -> SessionContext {
    let tenant_id = persistence.ensure_tenant(tenant).unwrap().tenant_id;
    let username = Username::new(username);
    let user_id = persistence
        .create_user(tenant_id, &username, TEST_PASSWORD, role, None)
        .unwrap();
    SessionContext {
        user_id,
        username,
        tenant_id,
        role,
    }
}

/// Logs in with the default admin and returns its session context.
pub fn default_admin(persistence: &mut Persistence) -> SessionContext {
    AuthenticationService::login(
        persistence,
        &AuthSettings::default(),
        "interadmin00",
        "Entregas@2024",
        test_now(),
    )
    .unwrap()
    .context
}

/// A minimal valid delivery form.
pub fn delivery_form(client_name: &str) -> CreateDeliveryRequest {
    CreateDeliveryRequest {
        client_name: client_name.to_string(),
        address: String::from("Rua das Flores, 12"),
        client_email: Some(String::from("cliente@example.com")),
        ..CreateDeliveryRequest::default()
    }
}

/// Notifier that remembers which deliveries it saw.
#[derive(Default)]
pub struct RecordingNotifier {
    pub seen: Mutex<Vec<i64>>,
}

impl DeliveryNotifier for RecordingNotifier {
    fn notify_delivery(&self, record: &DeliveryRecord) -> Result<(), NotifyError> {
        self.seen.lock().unwrap().push(record.delivery_id);
        Ok(())
    }
}

/// Notifier that always fails.
pub struct FailingNotifier;

impl DeliveryNotifier for FailingNotifier {
    fn notify_delivery(&self, _record: &DeliveryRecord) -> Result<(), NotifyError> {
        Err(NotifyError::Render(String::from("mail relay unreachable")))
    }
}
