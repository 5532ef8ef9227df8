// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Login, session and registration tests.

use entregas_domain::{Role, Username};
use time::Duration;

use super::helpers::{TEST_PASSWORD, create_account, create_test_persistence, test_now};
use crate::{
    ApiError, AuthError, AuthSettings, AuthenticationService, LoginRequest, RegisterRequest,
    login, logout, register, whoami,
};

fn login_request(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

fn register_request(username: &str, password: &str, confirmation: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        password: password.to_string(),
        password_confirmation: confirmation.to_string(),
        phone: None,
    }
}

#[test]
fn test_login_with_correct_password_opens_session() {
    let mut persistence = create_test_persistence();
    create_account(&mut persistence, "Empresa Demo", "joao", Role::Entregador);

    let response = login(
        &mut persistence,
        &AuthSettings::default(),
        &login_request("JOAO", TEST_PASSWORD),
        test_now(),
    )
    .unwrap();

    assert_eq!(response.username, "joao");
    assert_eq!(response.role, Role::Entregador);
    assert_eq!(response.expires_at, "2026-03-01 22:00:00");

    let context =
        AuthenticationService::validate_session(&mut persistence, &response.session_token, test_now())
            .unwrap();
    assert_eq!(context.username, Username::new("joao"));
    assert_eq!(context.tenant_id, response.tenant_id);
}

#[test]
fn test_wrong_password_and_unknown_user_get_same_message() {
    let mut persistence = create_test_persistence();
    create_account(&mut persistence, "Empresa Demo", "joao", Role::Entregador);
    let settings = AuthSettings::default();

    let wrong_password = login(
        &mut persistence,
        &settings,
        &login_request("joao", "not-the-password"),
        test_now(),
    );
    let unknown_user = login(
        &mut persistence,
        &settings,
        &login_request("ninguem", TEST_PASSWORD),
        test_now(),
    );

    let expected = Err(ApiError::AuthenticationFailed {
        reason: String::from("Invalid username or password"),
    });
    assert_eq!(wrong_password, expected);
    assert_eq!(unknown_user, expected);
}

#[test]
fn test_every_attempt_is_logged() {
    let mut persistence = create_test_persistence();
    let joao = create_account(&mut persistence, "Empresa Demo", "joao", Role::Entregador);
    let settings = AuthSettings::default();

    let _ = login(
        &mut persistence,
        &settings,
        &login_request("joao", "wrong"),
        test_now(),
    );
    login(
        &mut persistence,
        &settings,
        &login_request("Joao", TEST_PASSWORD),
        test_now(),
    )
    .unwrap();
    let _ = login(
        &mut persistence,
        &settings,
        &login_request("ghost", "whatever"),
        test_now(),
    );

    let attempts = persistence.list_login_attempts("joao").unwrap();
    assert_eq!(
        attempts.iter().map(|a| a.success).collect::<Vec<bool>>(),
        vec![false, true]
    );
    assert_eq!(attempts[0].attempted_at, "2026-03-01 10:00:00");
    assert!(attempts.iter().all(|a| a.user_id == Some(joao.user_id)));

    let ghost = persistence.list_login_attempts("ghost").unwrap();
    assert_eq!(ghost.len(), 1);
    assert!(!ghost[0].success);
    assert_eq!(ghost[0].user_id, None);
}

#[test]
fn test_two_logins_create_two_sessions() {
    let mut persistence = create_test_persistence();
    let joao = create_account(&mut persistence, "Empresa Demo", "joao", Role::Entregador);
    let settings = AuthSettings::default();

    let first = login(
        &mut persistence,
        &settings,
        &login_request("joao", TEST_PASSWORD),
        test_now(),
    )
    .unwrap();
    let second = login(
        &mut persistence,
        &settings,
        &login_request("joao", TEST_PASSWORD),
        test_now(),
    )
    .unwrap();

    assert_ne!(first.session_token, second.session_token);
    assert_eq!(persistence.count_sessions_for_user(joao.user_id).unwrap(), 2);
}

#[test]
fn test_expired_session_is_rejected_and_removed() {
    let mut persistence = create_test_persistence();
    create_account(&mut persistence, "Empresa Demo", "joao", Role::Entregador);
    let settings = AuthSettings {
        session_ttl: Duration::hours(1),
        ..AuthSettings::default()
    };

    let response = login(
        &mut persistence,
        &settings,
        &login_request("joao", TEST_PASSWORD),
        test_now(),
    )
    .unwrap();

    let later = test_now() + Duration::hours(2);
    let result =
        AuthenticationService::validate_session(&mut persistence, &response.session_token, later);

    assert_eq!(
        result,
        Err(AuthError::AuthenticationFailed {
            reason: String::from("Session expired")
        })
    );
    assert!(
        persistence
            .get_session_by_token(&response.session_token)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_logout_invalidates_session() {
    let mut persistence = create_test_persistence();
    create_account(&mut persistence, "Empresa Demo", "joao", Role::Entregador);

    let response = login(
        &mut persistence,
        &AuthSettings::default(),
        &login_request("joao", TEST_PASSWORD),
        test_now(),
    )
    .unwrap();
    logout(&mut persistence, &response.session_token).unwrap();

    assert!(
        AuthenticationService::validate_session(
            &mut persistence,
            &response.session_token,
            test_now()
        )
        .is_err()
    );
}

#[test]
fn test_register_creates_entregador_in_default_tenant() {
    let mut persistence = create_test_persistence();
    let settings = AuthSettings::default();

    let response = register(
        &mut persistence,
        &settings,
        &register_request("  Novo.Entregador ", "Senha-nova1", "Senha-nova1"),
    )
    .unwrap();

    assert_eq!(response.username, "novo.entregador");
    assert_eq!(response.tenant_name, "Empresa Demo");
    assert_eq!(response.role, Role::Entregador);

    let session = login(
        &mut persistence,
        &settings,
        &login_request("novo.entregador", "Senha-nova1"),
        test_now(),
    )
    .unwrap();
    let context =
        AuthenticationService::validate_session(&mut persistence, &session.session_token, test_now())
            .unwrap();
    assert_eq!(whoami(&mut persistence, &context).unwrap().tenant_name, "Empresa Demo");
}

#[test]
fn test_register_rejects_case_folded_duplicate() {
    let mut persistence = create_test_persistence();
    let settings = AuthSettings::default();
    register(
        &mut persistence,
        &settings,
        &register_request("maria", "Senha-nova1", "Senha-nova1"),
    )
    .unwrap();

    let result = register(
        &mut persistence,
        &settings,
        &register_request("MARIA", "Senha-nova1", "Senha-nova1"),
    );

    assert_eq!(
        result,
        Err(ApiError::DuplicateUsername {
            username: String::from("maria")
        })
    );
}

#[test]
fn test_register_validates_username_and_password() {
    let mut persistence = create_test_persistence();
    let settings = AuthSettings::default();

    let bad_name = register(
        &mut persistence,
        &settings,
        &register_request("jo", "Senha-nova1", "Senha-nova1"),
    );
    assert!(matches!(
        bad_name,
        Err(ApiError::InvalidInput { field, .. }) if field == "username"
    ));

    let mismatch = register(
        &mut persistence,
        &settings,
        &register_request("maria", "Senha-nova1", "Senha-nova2"),
    );
    assert_eq!(
        mismatch,
        Err(ApiError::PasswordPolicyViolation {
            message: String::from("Password and confirmation do not match")
        })
    );

    let weak = register(
        &mut persistence,
        &settings,
        &register_request("maria", "short", "short"),
    );
    assert!(matches!(weak, Err(ApiError::PasswordPolicyViolation { .. })));

    assert!(
        persistence
            .get_user_by_username(&Username::new("maria"))
            .unwrap()
            .is_none()
    );
}
