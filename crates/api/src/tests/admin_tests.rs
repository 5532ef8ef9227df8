// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account administration and usage report tests.

use entregas_domain::Role;

use super::helpers::{
    TEST_PASSWORD, create_account, create_test_persistence, default_admin, delivery_form,
    test_now,
};
use crate::{
    ApiError, AuthSettings, CreateUserRequest, LogNotifier, LoginRequest, create_delivery,
    create_user, delete_user, list_users, login, usage,
};

fn create_request(username: &str, role: &str) -> CreateUserRequest {
    CreateUserRequest {
        username: username.to_string(),
        password: String::from(TEST_PASSWORD),
        password_confirmation: String::from(TEST_PASSWORD),
        role: role.to_string(),
        phone: Some(String::from("11 99999-0000")),
    }
}

#[test]
fn test_admin_creates_account_in_own_tenant() {
    let mut persistence = create_test_persistence();
    let acme_admin = create_account(&mut persistence, "Acme", "acme.admin", Role::Admin);

    let response = create_user(
        &mut persistence,
        &AuthSettings::default(),
        &acme_admin,
        &create_request("Motorista1", "motorista"),
    )
    .unwrap();

    assert_eq!(response.username, "motorista1");
    assert_eq!(response.role, Role::Entregador);

    let stored = persistence.get_user_by_id(response.user_id).unwrap().unwrap();
    assert_eq!(stored.tenant_id, acme_admin.tenant_id);
    assert_eq!(stored.phone.as_deref(), Some("11 99999-0000"));
}

#[test]
fn test_create_user_rejects_bad_role_and_duplicates() {
    let mut persistence = create_test_persistence();
    let admin = default_admin(&mut persistence);
    let settings = AuthSettings::default();

    assert!(matches!(
        create_user(&mut persistence, &settings, &admin, &create_request("maria", "gerente")),
        Err(ApiError::InvalidInput { field, .. }) if field == "role"
    ));

    create_user(&mut persistence, &settings, &admin, &create_request("maria", "admin")).unwrap();
    assert_eq!(
        create_user(&mut persistence, &settings, &admin, &create_request("Maria", "admin")),
        Err(ApiError::DuplicateUsername {
            username: String::from("maria")
        })
    );
}

#[test]
fn test_entregador_cannot_administer_accounts() {
    let mut persistence = create_test_persistence();
    let joao = create_account(&mut persistence, "Empresa Demo", "joao", Role::Entregador);

    assert!(matches!(
        list_users(&mut persistence, &joao),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        create_user(
            &mut persistence,
            &AuthSettings::default(),
            &joao,
            &create_request("maria", "entregador")
        ),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        usage(&mut persistence, &joao),
        Err(ApiError::Unauthorized { .. })
    ));
}

#[test]
fn test_list_users_shows_only_own_tenant() {
    let mut persistence = create_test_persistence();
    let admin = default_admin(&mut persistence);
    create_account(&mut persistence, "Empresa Demo", "joao", Role::Entregador);
    create_account(&mut persistence, "Acme", "pedro", Role::Entregador);

    let names: Vec<String> = list_users(&mut persistence, &admin)
        .unwrap()
        .users
        .into_iter()
        .map(|u| u.username)
        .collect();

    assert_eq!(names, vec![String::from("interadmin00"), String::from("joao")]);
}

#[test]
fn test_delete_user_rules() {
    let mut persistence = create_test_persistence();
    let admin = default_admin(&mut persistence);
    let joao = create_account(&mut persistence, "Empresa Demo", "joao", Role::Entregador);
    let pedro = create_account(&mut persistence, "Acme", "pedro", Role::Entregador);

    assert!(matches!(
        delete_user(&mut persistence, &admin, admin.user_id),
        Err(ApiError::DomainRuleViolation { .. })
    ));
    assert!(matches!(
        delete_user(&mut persistence, &admin, pedro.user_id),
        Err(ApiError::ResourceNotFound { .. })
    ));
    assert!(persistence.get_user_by_id(pedro.user_id).unwrap().is_some());

    create_delivery(&mut persistence, &LogNotifier, &joao, delivery_form("A"), test_now()).unwrap();
    delete_user(&mut persistence, &admin, joao.user_id).unwrap();

    assert!(persistence.get_user_by_id(joao.user_id).unwrap().is_none());
    assert!(
        persistence
            .list_deliveries_for_tenant(admin.tenant_id)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_usage_report_counts_deliveries_and_logins() {
    let mut persistence = create_test_persistence();
    let admin = default_admin(&mut persistence);
    let joao = create_account(&mut persistence, "Empresa Demo", "joao", Role::Entregador);
    let settings = AuthSettings::default();

    create_delivery(&mut persistence, &LogNotifier, &joao, delivery_form("A"), test_now()).unwrap();
    login(
        &mut persistence,
        &settings,
        &LoginRequest {
            username: String::from("joao"),
            password: String::from(TEST_PASSWORD),
        },
        test_now(),
    )
    .unwrap();

    let report = usage(&mut persistence, &admin).unwrap().users;

    assert_eq!(report.len(), 2);
    let admin_row = &report[0];
    assert_eq!(admin_row.username, "interadmin00");
    assert_eq!(admin_row.successful_logins, 1);

    let joao_row = &report[1];
    assert_eq!(joao_row.username, "joao");
    assert_eq!(joao_row.pending, 1);
    assert_eq!(joao_row.total_deliveries, 1);
    assert_eq!(joao_row.successful_logins, 1);
}
