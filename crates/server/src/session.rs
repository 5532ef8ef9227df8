// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server.
//!
//! This module provides the Axum extractor that resolves the bearer token
//! of a request into a [`SessionContext`].

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use entregas_api::{ApiError, AuthError, AuthenticationService, SessionContext};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::{AppState, HttpError};

/// Extractor for authenticated sessions.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     SessionUser { context, .. }: SessionUser,
/// ) -> Result<Json<Response>, HttpError> {
///     // context.tenant_id scopes every query
/// }
/// ```
///
/// # Errors
///
/// Rejects with HTTP 401 if:
/// - The Authorization header is missing or not `Bearer <token>`
/// - The session token is unknown or expired
/// - The account behind the session no longer exists
pub struct SessionUser {
    /// The resolved session context.
    pub context: SessionContext,
    /// The bearer token, needed for logout.
    pub token: String,
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                SessionError::MissingAuthorizationHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                SessionError::InvalidAuthorizationHeader
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("Authorization header does not start with 'Bearer '");
            SessionError::InvalidAuthorizationHeader
        })?;

        let mut persistence = state.persistence.lock().await;
        let context: SessionContext = AuthenticationService::validate_session(
            &mut persistence,
            token,
            OffsetDateTime::now_utc(),
        )
        .map_err(|e| {
            warn!(error = %e, "Session validation failed");
            SessionError::InvalidSession(e)
        })?;

        debug!(
            username = %context.username,
            tenant_id = context.tenant_id,
            role = %context.role,
            "Session validated successfully"
        );

        Ok(Self {
            context,
            token: token.to_string(),
        })
    }
}

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// Session validation failed.
    InvalidSession(AuthError),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let error: HttpError = match self {
            Self::MissingAuthorizationHeader => HttpError {
                status: StatusCode::UNAUTHORIZED,
                message: String::from("Missing Authorization header"),
            },
            Self::InvalidAuthorizationHeader => HttpError {
                status: StatusCode::UNAUTHORIZED,
                message: String::from(
                    "Invalid Authorization header format. Expected: 'Bearer <token>'",
                ),
            },
            Self::InvalidSession(err) => HttpError::from(ApiError::from(err)),
        };

        error.into_response()
    }
}
