// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use entregas_domain::{Role, Username, format_timestamp};
use entregas_persistence::{Persistence, PersistenceError, SessionData, UserData, verify_password};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::AuthError;
use crate::password_policy::PasswordPolicy;

/// The single message shown for any failed login.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Username of the administrator created on first run.
pub const DEFAULT_ADMIN_USERNAME: &str = "interadmin00";

/// The per-request session context.
///
/// Resolved from the bearer token on every request. The tenant id here is
/// the only tenant any handler reads from or writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// The account id.
    pub user_id: i64,
    /// The case-folded username.
    pub username: Username,
    /// The tenant the account belongs to.
    pub tenant_id: i64,
    /// The account role.
    pub role: Role,
}

impl SessionContext {
    fn from_user(user: &UserData) -> Self {
        Self {
            user_id: user.user_id,
            username: Username::new(&user.username),
            tenant_id: user.tenant_id,
            role: user.role,
        }
    }
}

/// Settings that govern authentication and first-run bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    /// How long a session stays valid after login.
    pub session_ttl: Duration,
    /// The tenant self-registered accounts join.
    pub default_tenant: String,
    /// The password given to the default admin on first run.
    pub admin_password: String,
    /// The password policy for new accounts.
    pub password_policy: PasswordPolicy,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            session_ttl: Duration::hours(12),
            default_tenant: String::from("Empresa Demo"),
            admin_password: String::from("Entregas@2024"),
            password_policy: PasswordPolicy::default(),
        }
    }
}

/// A successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// The bearer token for subsequent requests.
    pub session_token: String,
    /// When the session expires (storage timestamp).
    pub expires_at: String,
    /// The session context of the logged-in account.
    pub context: SessionContext,
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the session belongs to an admin.
    ///
    /// # Arguments
    ///
    /// * `context` - The session context
    /// * `action` - The action being attempted, used in the error
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not have the admin role.
    pub fn require_admin(context: &SessionContext, action: &str) -> Result<(), AuthError> {
        if context.role.is_admin() {
            return Ok(());
        }

        warn!(
            username = %context.username,
            action, "Rejected non-admin request"
        );
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            required_role: String::from("admin"),
        })
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Verifies credentials and opens a session.
    ///
    /// Every attempt is appended to the login log, including attempts for
    /// unknown usernames. Failures never reveal which field was wrong.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `settings` - Session lifetime settings
    /// * `username` - The submitted username (case-folded here)
    /// * `password` - The submitted password
    /// * `now` - The current instant
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` for bad credentials and `Storage`
    /// if the store cannot be read or written.
    pub fn login(
        persistence: &mut Persistence,
        settings: &AuthSettings,
        username: &str,
        password: &str,
        now: OffsetDateTime,
    ) -> Result<LoginOutcome, AuthError> {
        let username: Username = Username::new(username);
        let attempted_at: String = Self::timestamp(now)?;

        let user: Option<UserData> = persistence
            .get_user_by_username(&username)
            .map_err(Self::map_persistence_error)?;

        let account_id: Option<i64> = user.as_ref().map(|user| user.user_id);
        let verified: Option<UserData> = user.filter(|user| {
            verify_password(password, &user.password_hash).unwrap_or_else(|e| {
                warn!(username = %user.username, "Stored password hash is unusable: {e}");
                false
            })
        });

        persistence
            .record_login_attempt(
                username.value(),
                account_id,
                verified.is_some(),
                &attempted_at,
            )
            .map_err(Self::map_persistence_error)?;

        let Some(user) = verified else {
            warn!(username = %username, "Login rejected");
            return Err(AuthError::AuthenticationFailed {
                reason: String::from(INVALID_CREDENTIALS),
            });
        };

        let session_token: String = Uuid::new_v4().to_string();
        let expires_at: String = Self::timestamp(now + settings.session_ttl)?;

        persistence
            .create_session(&session_token, user.user_id, &attempted_at, &expires_at)
            .map_err(Self::map_persistence_error)?;

        info!(username = %user.username, tenant_id = user.tenant_id, "Login succeeded");

        Ok(LoginOutcome {
            session_token,
            expires_at,
            context: SessionContext::from_user(&user),
        })
    }

    /// Validates a session token and returns the session context.
    ///
    /// Expired sessions are deleted when encountered.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or expired, or its
    /// account no longer exists.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
        now: OffsetDateTime,
    ) -> Result<SessionContext, AuthError> {
        let now: String = Self::timestamp(now)?;

        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        if session.expires_at <= now {
            debug!(session_id = session.session_id, "Session expired");
            persistence
                .delete_session(session_token)
                .map_err(Self::map_persistence_error)?;
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: UserData = persistence
            .get_user_by_id(session.user_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Account no longer exists"),
            })?;

        persistence
            .update_session_activity(session.session_id, &now)
            .map_err(Self::map_persistence_error)?;

        Ok(SessionContext::from_user(&user))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be deleted.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(Self::map_persistence_error)
    }

    fn timestamp(instant: OffsetDateTime) -> Result<String, AuthError> {
        format_timestamp(instant).map_err(|e| AuthError::Storage {
            message: e.to_string(),
        })
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::Storage {
            message: err.to_string(),
        }
    }
}
