// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use entregas_domain::{Role, Username};
use entregas_persistence::Persistence;

use super::helpers::test_now;
use crate::{ApiError, AuthSettings, LoginRequest, bootstrap_defaults, login};

fn fresh_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap().with_bcrypt_cost(4)
}

#[test]
fn test_bootstrap_creates_tenant_and_admin_once() {
    let mut persistence = fresh_persistence();
    let settings = AuthSettings::default();

    let first = bootstrap_defaults(&mut persistence, &settings).unwrap();
    let second = bootstrap_defaults(&mut persistence, &settings).unwrap();

    assert!(first.admin_created);
    assert!(!second.admin_created);
    assert_eq!(first.tenant_id, second.tenant_id);
    assert_eq!(persistence.count_users().unwrap(), 1);

    let admin = persistence
        .get_user_by_username(&Username::new("interadmin00"))
        .unwrap()
        .unwrap();
    assert_eq!(admin.role, Role::Admin);
    assert_eq!(admin.tenant_id, first.tenant_id);
    assert!(!admin.password_hash.is_empty());
    assert_ne!(admin.password_hash, "Entregas@2024");
}

#[test]
fn test_default_admin_can_log_in_twice() {
    let mut persistence = fresh_persistence();
    let settings = AuthSettings::default();
    bootstrap_defaults(&mut persistence, &settings).unwrap();

    let request = LoginRequest {
        username: String::from("interadmin00"),
        password: String::from("Entregas@2024"),
    };
    login(&mut persistence, &settings, &request, test_now()).unwrap();
    login(&mut persistence, &settings, &request, test_now()).unwrap();

    let attempts = persistence.list_login_attempts("interadmin00").unwrap();
    assert_eq!(attempts.len(), 2);
    assert!(attempts.iter().all(|a| a.success));
}

#[test]
fn test_configured_admin_password_and_tenant() {
    let mut persistence = fresh_persistence();
    let settings = AuthSettings {
        default_tenant: String::from("Transportes Sul"),
        admin_password: String::from("Outra#Senha9"),
        ..AuthSettings::default()
    };
    bootstrap_defaults(&mut persistence, &settings).unwrap();

    assert!(
        persistence
            .get_tenant_by_name("Transportes Sul")
            .unwrap()
            .is_some()
    );
    let request = LoginRequest {
        username: String::from("interadmin00"),
        password: String::from("Outra#Senha9"),
    };
    assert!(login(&mut persistence, &settings, &request, test_now()).is_ok());
}

#[test]
fn test_blank_tenant_name_is_rejected() {
    let mut persistence = fresh_persistence();
    let settings = AuthSettings {
        default_tenant: String::from("  "),
        ..AuthSettings::default()
    };

    assert!(matches!(
        bootstrap_defaults(&mut persistence, &settings),
        Err(ApiError::InvalidInput { field, .. }) if field == "tenant"
    ));
}
