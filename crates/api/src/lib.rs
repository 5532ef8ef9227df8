// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the delivery registry.
//!
//! Handlers here are transport-agnostic: they take the persistence
//! adapter, the resolved session context and a request value, and return
//! a response value or an [`ApiError`]. The HTTP server maps both onto
//! the wire.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod bootstrap;
mod error;
mod export;
mod handlers;
mod notify;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{
    AuthSettings, AuthenticationService, AuthorizationService, DEFAULT_ADMIN_USERNAME,
    INVALID_CREDENTIALS, LoginOutcome, SessionContext,
};
pub use bootstrap::{BootstrapOutcome, bootstrap_defaults};
pub use error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
pub use export::{EXPORT_HEADER, ExportError, ExportRow, export_file_name, export_slice, parse_export};
pub use handlers::{
    MAX_ATTACHMENT_BYTES, close_day, close_my_deliveries, create_delivery, create_user,
    delete_user, export_my_deliveries, export_tenant_deliveries, list_my_deliveries,
    list_tenant_deliveries, list_users, login, logout, register, usage, whoami,
};
pub use notify::{DeliveryNotifier, LogNotifier, NotifyError, SpoolNotifier, notify_best_effort};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    CloseBatchResponse, CloseDayRequest, CreateDeliveryRequest, CreateDeliveryResponse,
    CreateUserRequest, CreateUserResponse, DeleteUserResponse, DeliveryRecord, ExportResponse,
    ListDeliveriesResponse, ListUsersResponse, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse, UsageEntry, UsageResponse, UserInfo, WhoAmIResponse,
};
