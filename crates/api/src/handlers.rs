// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request handlers.
//!
//! Each handler serves one user gesture. Handlers that act on data take
//! the [`SessionContext`] and read the tenant id from it, never from the
//! request. Admin-only handlers check the role before touching the store.

use std::str::FromStr;

use entregas_domain::{
    ClosePredicate, DeliveryStatus, Role, Username, format_timestamp, parse_day,
    validate_delivery_fields, validate_initial_status, validate_username,
};
use entregas_persistence::{DeliveryData, NewDelivery, Persistence, TenantData, UserData};
use time::{Date, OffsetDateTime, UtcOffset};
use tracing::info;

use crate::auth::{AuthSettings, AuthenticationService, AuthorizationService, SessionContext};
use crate::error::ApiError;
use crate::export::{export_file_name, export_slice};
use crate::notify::{DeliveryNotifier, notify_best_effort};
use crate::request_response::{
    CloseBatchResponse, CloseDayRequest, CreateDeliveryRequest, CreateDeliveryResponse,
    CreateUserRequest, CreateUserResponse, DeleteUserResponse, DeliveryRecord, ExportResponse,
    ListDeliveriesResponse, ListUsersResponse, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse, UsageResponse, UserInfo, WhoAmIResponse,
};

/// Largest accepted photo or signature, in bytes.
pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

/// Prefix of generated tracking codes.
const TRACKING_PREFIX: &str = "ENT-";

// ============================================================================
// Authentication
// ============================================================================

/// Registers a delivery account in the default tenant.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `settings` - Default tenant and password policy
/// * `request` - The registration request
///
/// # Errors
///
/// Returns an error if:
/// - The username is malformed
/// - The username is already taken
/// - The password violates the policy or does not match its confirmation
pub fn register(
    persistence: &mut Persistence,
    settings: &AuthSettings,
    request: &RegisterRequest,
) -> Result<RegisterResponse, ApiError> {
    let username: Username = Username::new(&request.username);
    validate_username(&username)?;

    if persistence.get_user_by_username(&username)?.is_some() {
        return Err(ApiError::DuplicateUsername {
            username: username.value().to_string(),
        });
    }

    settings.password_policy.validate(
        &request.password,
        &request.password_confirmation,
        username.value(),
    )?;

    let tenant: TenantData = persistence.ensure_tenant(settings.default_tenant.trim())?;
    let user_id: i64 = persistence.create_user(
        tenant.tenant_id,
        &username,
        &request.password,
        Role::Entregador,
        optional_text(request.phone.as_deref()).as_deref(),
    )?;

    info!(user_id, username = %username, tenant = %tenant.name, "Account registered");

    Ok(RegisterResponse {
        user_id,
        username: username.value().to_string(),
        tenant_name: tenant.name,
        role: Role::Entregador,
    })
}

/// Logs in and opens a session.
///
/// # Errors
///
/// Returns `AuthenticationFailed` with a generic message for any bad
/// credential.
pub fn login(
    persistence: &mut Persistence,
    settings: &AuthSettings,
    request: &LoginRequest,
    now: OffsetDateTime,
) -> Result<LoginResponse, ApiError> {
    let outcome = AuthenticationService::login(
        persistence,
        settings,
        &request.username,
        &request.password,
        now,
    )?;

    Ok(LoginResponse {
        session_token: outcome.session_token,
        username: outcome.context.username.value().to_string(),
        role: outcome.context.role,
        tenant_id: outcome.context.tenant_id,
        expires_at: outcome.expires_at,
    })
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the logout fails.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Describes the current session.
///
/// # Errors
///
/// Returns an error if the tenant cannot be read.
pub fn whoami(
    persistence: &mut Persistence,
    context: &SessionContext,
) -> Result<WhoAmIResponse, ApiError> {
    let tenant: TenantData = persistence
        .get_tenant_by_id(context.tenant_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Tenant"),
            message: format!("Tenant {} does not exist", context.tenant_id),
        })?;

    Ok(WhoAmIResponse {
        user_id: context.user_id,
        username: context.username.value().to_string(),
        role: context.role,
        tenant_id: context.tenant_id,
        tenant_name: tenant.name,
    })
}

// ============================================================================
// Deliveries
// ============================================================================

/// Records a delivery for the session user.
///
/// The tracking code is generated when none is given. The notifier runs
/// after the insert and its failure does not affect the result.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `notifier` - The confirmation sink
/// * `context` - The session context (tenant and author)
/// * `request` - The delivery form
/// * `now` - The creation instant
///
/// # Errors
///
/// Returns an error if:
/// - The client name or address is empty
/// - The client email is malformed
/// - The status is unknown or `Closed`
/// - An attachment exceeds [`MAX_ATTACHMENT_BYTES`]
pub fn create_delivery(
    persistence: &mut Persistence,
    notifier: &dyn DeliveryNotifier,
    context: &SessionContext,
    request: CreateDeliveryRequest,
    now: OffsetDateTime,
) -> Result<CreateDeliveryResponse, ApiError> {
    let client_email: Option<String> = optional_text(request.client_email.as_deref());
    validate_delivery_fields(
        &request.client_name,
        &request.address,
        client_email.as_deref(),
    )?;

    let status: DeliveryStatus = match optional_text(request.status.as_deref()) {
        Some(raw) => DeliveryStatus::from_str(&raw)?,
        None => DeliveryStatus::default(),
    };
    validate_initial_status(status)?;

    let photo: Option<Vec<u8>> = checked_attachment("photo", request.photo)?;
    let signature: Option<Vec<u8>> = checked_attachment("signature", request.signature)?;

    let tracking_code: String = optional_text(request.tracking_code.as_deref())
        .unwrap_or_else(generate_tracking_code);

    let new_delivery: NewDelivery = NewDelivery {
        tenant_id: context.tenant_id,
        user_id: context.user_id,
        entregador: context.username.value().to_string(),
        client_name: request.client_name.trim().to_string(),
        address: request.address.trim().to_string(),
        client_email,
        client_phone: optional_text(request.client_phone.as_deref()),
        status,
        note: request.note.as_deref().map(str::trim).unwrap_or_default().to_string(),
        tracking_code: Some(tracking_code),
        photo,
        signature,
        created_at: format_timestamp(now)?,
    };

    let delivery_id: i64 = persistence.insert_delivery(&new_delivery)?;
    let stored: DeliveryData = persistence
        .get_delivery(context.tenant_id, delivery_id)?
        .ok_or_else(|| ApiError::Internal {
            message: format!("Delivery {delivery_id} not found after insert"),
        })?;

    let record: DeliveryRecord = DeliveryRecord::from(stored);
    notify_best_effort(notifier, &record);

    Ok(CreateDeliveryResponse {
        message: format!("Delivery {delivery_id} recorded"),
        delivery: record,
    })
}

/// Lists the session user's deliveries, newest first.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list_my_deliveries(
    persistence: &mut Persistence,
    context: &SessionContext,
) -> Result<ListDeliveriesResponse, ApiError> {
    let deliveries: Vec<DeliveryRecord> = persistence
        .list_deliveries_for_user(context.tenant_id, &context.username)?
        .into_iter()
        .map(DeliveryRecord::from)
        .collect();

    Ok(ListDeliveriesResponse { deliveries })
}

/// Lists every delivery of the session's tenant, newest first.
///
/// Admin only.
///
/// # Errors
///
/// Returns an error if the session is not an admin or the store cannot be
/// read.
pub fn list_tenant_deliveries(
    persistence: &mut Persistence,
    context: &SessionContext,
) -> Result<ListDeliveriesResponse, ApiError> {
    AuthorizationService::require_admin(context, "list_tenant_deliveries")?;

    let deliveries: Vec<DeliveryRecord> = persistence
        .list_deliveries_for_tenant(context.tenant_id)?
        .into_iter()
        .map(DeliveryRecord::from)
        .collect();

    Ok(ListDeliveriesResponse { deliveries })
}

/// Closes every open delivery of the session user.
///
/// # Errors
///
/// Returns an error if the store cannot be updated.
pub fn close_my_deliveries(
    persistence: &mut Persistence,
    context: &SessionContext,
) -> Result<CloseBatchResponse, ApiError> {
    let closed: usize = persistence.close_batch(&ClosePredicate::AllForUser {
        tenant_id: context.tenant_id,
        username: context.username.clone(),
    })?;

    Ok(CloseBatchResponse {
        closed,
        message: format!("Closed {closed} deliveries"),
    })
}

/// Closes every open delivery of the tenant created on one UTC day.
///
/// Admin only. The day defaults to the current UTC day.
///
/// # Errors
///
/// Returns an error if the session is not an admin, the day is malformed,
/// or the store cannot be updated.
pub fn close_day(
    persistence: &mut Persistence,
    context: &SessionContext,
    request: &CloseDayRequest,
    now: OffsetDateTime,
) -> Result<CloseBatchResponse, ApiError> {
    AuthorizationService::require_admin(context, "close_day")?;

    let day: Date = match optional_text(request.day.as_deref()) {
        Some(raw) => parse_day(&raw)?,
        None => utc_day(now),
    };

    let closed: usize = persistence.close_batch(&ClosePredicate::DayForTenant {
        tenant_id: context.tenant_id,
        day,
    })?;

    Ok(CloseBatchResponse {
        closed,
        message: format!("Closed {closed} deliveries of {day}"),
    })
}

/// Exports the session user's deliveries as CSV.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the export fails.
pub fn export_my_deliveries(
    persistence: &mut Persistence,
    context: &SessionContext,
    now: OffsetDateTime,
) -> Result<ExportResponse, ApiError> {
    let records: Vec<DeliveryRecord> = list_my_deliveries(persistence, context)?.deliveries;
    build_export(context.username.value(), &records, now)
}

/// Exports every delivery of the session's tenant as CSV.
///
/// Admin only.
///
/// # Errors
///
/// Returns an error if the session is not an admin, the store cannot be
/// read, or the export fails.
pub fn export_tenant_deliveries(
    persistence: &mut Persistence,
    context: &SessionContext,
    now: OffsetDateTime,
) -> Result<ExportResponse, ApiError> {
    let records: Vec<DeliveryRecord> = list_tenant_deliveries(persistence, context)?.deliveries;
    build_export("all", &records, now)
}

// ============================================================================
// Administration
// ============================================================================

/// Lists the accounts of the session's tenant.
///
/// Admin only.
///
/// # Errors
///
/// Returns an error if the session is not an admin or the store cannot be
/// read.
pub fn list_users(
    persistence: &mut Persistence,
    context: &SessionContext,
) -> Result<ListUsersResponse, ApiError> {
    AuthorizationService::require_admin(context, "list_users")?;

    let users: Vec<UserInfo> = persistence
        .list_users_for_tenant(context.tenant_id)?
        .into_iter()
        .map(UserInfo::from)
        .collect();

    Ok(ListUsersResponse { users })
}

/// Creates an account in the session's tenant.
///
/// Admin only.
///
/// # Errors
///
/// Returns an error if:
/// - The session is not an admin
/// - The username or role is malformed
/// - The username is already taken
/// - The password violates the policy
pub fn create_user(
    persistence: &mut Persistence,
    settings: &AuthSettings,
    context: &SessionContext,
    request: &CreateUserRequest,
) -> Result<CreateUserResponse, ApiError> {
    AuthorizationService::require_admin(context, "create_user")?;

    let username: Username = Username::new(&request.username);
    validate_username(&username)?;
    let role: Role = Role::from_str(&request.role)?;

    settings.password_policy.validate(
        &request.password,
        &request.password_confirmation,
        username.value(),
    )?;

    let user_id: i64 = persistence.create_user(
        context.tenant_id,
        &username,
        &request.password,
        role,
        optional_text(request.phone.as_deref()).as_deref(),
    )?;

    info!(
        user_id,
        username = %username,
        created_by = %context.username,
        "Account created by admin"
    );

    Ok(CreateUserResponse {
        user_id,
        username: username.value().to_string(),
        role,
        message: format!("Account '{username}' created"),
    })
}

/// Deletes an account of the session's tenant.
///
/// Admin only. The account's deliveries and sessions go with it. An id
/// that belongs to another tenant is reported as not found.
///
/// # Errors
///
/// Returns an error if the session is not an admin, targets itself, or
/// the account does not exist in the tenant.
pub fn delete_user(
    persistence: &mut Persistence,
    context: &SessionContext,
    user_id: i64,
) -> Result<DeleteUserResponse, ApiError> {
    AuthorizationService::require_admin(context, "delete_user")?;

    if user_id == context.user_id {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("no_self_delete"),
            message: String::from("An admin cannot delete its own account"),
        });
    }

    let target: UserData = persistence
        .get_user_by_id(user_id)?
        .filter(|user| user.tenant_id == context.tenant_id)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User {user_id} does not exist"),
        })?;

    persistence.delete_user(context.tenant_id, user_id)?;

    info!(
        user_id,
        username = %target.username,
        deleted_by = %context.username,
        "Account deleted"
    );

    Ok(DeleteUserResponse {
        user_id,
        message: format!("Account '{}' deleted", target.username),
    })
}

/// Reports per-account activity for the session's tenant.
///
/// Admin only.
///
/// # Errors
///
/// Returns an error if the session is not an admin or the store cannot be
/// read.
pub fn usage(
    persistence: &mut Persistence,
    context: &SessionContext,
) -> Result<UsageResponse, ApiError> {
    AuthorizationService::require_admin(context, "usage")?;

    Ok(UsageResponse {
        users: persistence
            .usage_for_tenant(context.tenant_id)?
            .into_iter()
            .map(Into::into)
            .collect(),
    })
}

// ============================================================================
// Helpers
// ============================================================================

fn build_export(
    scope: &str,
    records: &[DeliveryRecord],
    now: OffsetDateTime,
) -> Result<ExportResponse, ApiError> {
    let content: Vec<u8> = export_slice(records)?;
    let file_name: String = export_file_name(scope, utc_day(now))?;

    info!(file_name = %file_name, rows = records.len(), "Export built");

    Ok(ExportResponse {
        file_name,
        content,
        row_count: records.len(),
    })
}

/// Trims an optional text field, mapping blank values to `None`.
fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Drops empty attachments and rejects oversized ones.
fn checked_attachment(field: &str, bytes: Option<Vec<u8>>) -> Result<Option<Vec<u8>>, ApiError> {
    match bytes {
        Some(bytes) if bytes.len() > MAX_ATTACHMENT_BYTES => Err(ApiError::InvalidInput {
            field: field.to_string(),
            message: format!(
                "Attachment is {} bytes, the limit is {MAX_ATTACHMENT_BYTES}",
                bytes.len()
            ),
        }),
        Some(bytes) if bytes.is_empty() => Ok(None),
        other => Ok(other),
    }
}

fn utc_day(now: OffsetDateTime) -> Date {
    now.to_offset(UtcOffset::UTC).date()
}

fn generate_tracking_code() -> String {
    format!("{TRACKING_PREFIX}{:08X}", rand::random::<u32>())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tracking_code_shape() {
        let code: String = generate_tracking_code();
        assert_eq!(code.len(), 12);
        assert!(code.starts_with("ENT-"));
        assert!(
            code[4..]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_optional_text_drops_blank_values() {
        assert_eq!(optional_text(None), None);
        assert_eq!(optional_text(Some("   ")), None);
        assert_eq!(
            optional_text(Some(" 11 9999-0000 ")),
            Some(String::from("11 9999-0000"))
        );
    }

    #[test]
    fn test_checked_attachment_limits() {
        assert_eq!(checked_attachment("photo", Some(Vec::new())), Ok(None));
        assert_eq!(
            checked_attachment("photo", Some(vec![1, 2, 3])),
            Ok(Some(vec![1, 2, 3]))
        );
        let oversized: Vec<u8> = vec![0; MAX_ATTACHMENT_BYTES + 1];
        assert!(matches!(
            checked_attachment("signature", Some(oversized)),
            Err(ApiError::InvalidInput { field, .. }) if field == "signature"
        ));
    }
}
