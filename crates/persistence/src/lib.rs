// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the delivery registry.
//!
//! This crate stores tenants, accounts, sessions, the login log and
//! delivery records. It is built on Diesel over `SQLite`.
//!
//! ## Tenant Scoping
//!
//! Every operation that touches users or deliveries takes a tenant id and
//! filters on it. A record that exists in another tenant is reported the
//! same way as a record that does not exist.
//!
//! ## Storage Conventions
//!
//! - Timestamps are UTC text in `YYYY-MM-DD HH:MM:SS` form, supplied by
//!   the caller so tests stay deterministic
//! - Statuses are stored by their canonical names
//! - Attachments are stored as raw bytes
//!
//! ## Testing Philosophy
//!
//! - Tests run against isolated in-memory `SQLite` databases
//! - Each `new_in_memory()` call gets its own database
//! - Tests lower the bcrypt cost with [`Persistence::with_bcrypt_cost`]

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

use diesel::SqliteConnection;
use entregas_domain::{ClosePredicate, Role, Username};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
pub mod mutations;
pub mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{
    DeliveryData, LoginAttemptData, NewDelivery, SessionData, TenantData, UsageData, UserData,
};
pub use error::PersistenceError;
pub use queries::users::verify_password;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the delivery registry.
///
/// Callers share one adapter behind a mutex, so each method runs with
/// exclusive access to the connection.
pub struct Persistence {
    conn: SqliteConnection,
    bcrypt_cost: u32,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared-cache database, so adapters
    /// created by different tests never see each other's rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::initialize_database(&shared_memory_url)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// The file is created if missing and migrated to the current schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::initialize_database(path_str)?;
        backend::enable_wal_mode(&mut conn)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Overrides the bcrypt work factor used for new password hashes.
    #[must_use]
    pub const fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Verifies that foreign key enforcement is still active.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Tenants
    // ========================================================================

    /// Returns the tenant with the given name, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn ensure_tenant(&mut self, name: &str) -> Result<TenantData, PersistenceError> {
        mutations::tenants::ensure_tenant(&mut self.conn, name)
    }

    /// Retrieves a tenant by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_tenant_by_name(&mut self, name: &str) -> Result<Option<TenantData>, PersistenceError> {
        queries::tenants::get_tenant_by_name(&mut self.conn, name)
    }

    /// Retrieves a tenant by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_tenant_by_id(&mut self, tenant_id: i64) -> Result<Option<TenantData>, PersistenceError> {
        queries::tenants::get_tenant_by_id(&mut self.conn, tenant_id)
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Creates a user inside a tenant, hashing the password with bcrypt.
    ///
    /// # Arguments
    ///
    /// * `tenant_id` - The owning tenant
    /// * `username` - The case-folded username
    /// * `password` - The plain-text password
    /// * `role` - The account role
    /// * `phone` - Optional contact phone
    ///
    /// # Errors
    ///
    /// Returns `DuplicateUsername` if the username is taken anywhere.
    pub fn create_user(
        &mut self,
        tenant_id: i64,
        username: &Username,
        password: &str,
        role: Role,
        phone: Option<&str>,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_user(
            &mut self.conn,
            tenant_id,
            username,
            password,
            role,
            phone,
            self.bcrypt_cost,
        )
    }

    /// Retrieves a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_username(
        &mut self,
        username: &Username,
    ) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_username(&mut self.conn, username)
    }

    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_id(&mut self.conn, user_id)
    }

    /// Lists the users of a tenant, ordered by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_users_for_tenant(&mut self, tenant_id: i64) -> Result<Vec<UserData>, PersistenceError> {
        queries::users::list_users_for_tenant(&mut self.conn, tenant_id)
    }

    /// Deletes a user of a tenant along with its deliveries and sessions.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if the user does not exist in this tenant.
    pub fn delete_user(&mut self, tenant_id: i64, user_id: i64) -> Result<(), PersistenceError> {
        mutations::users::delete_user(&mut self.conn, tenant_id, user_id)
    }

    /// Counts all users across tenants.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_users(&mut self) -> Result<i64, PersistenceError> {
        queries::users::count_users(&mut self.conn)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Creates a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: i64,
        created_at: &str,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::sessions::create_session(
            &mut self.conn,
            session_token,
            user_id,
            created_at,
            expires_at,
        )
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::sessions::get_session_by_token(&mut self.conn, session_token)
    }

    /// Records activity on a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_session_activity(
        &mut self,
        session_id: i64,
        now: &str,
    ) -> Result<(), PersistenceError> {
        mutations::sessions::update_session_activity(&mut self.conn, session_id, now)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::sessions::delete_session(&mut self.conn, session_token)
    }

    /// Deletes every session expired at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_expired_sessions(&mut self, now: &str) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_expired_sessions(&mut self.conn, now)
    }

    /// Counts the sessions held by one user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_sessions_for_user(&mut self, user_id: i64) -> Result<i64, PersistenceError> {
        queries::sessions::count_sessions_for_user(&mut self.conn, user_id)
    }

    // ========================================================================
    // Login log
    // ========================================================================

    /// Appends one login attempt to the log.
    ///
    /// `user_id` is the account the username resolved to, or `None` for
    /// unknown usernames.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn record_login_attempt(
        &mut self,
        username: &str,
        user_id: Option<i64>,
        success: bool,
        attempted_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::login_log::record_login_attempt(
            &mut self.conn,
            username,
            user_id,
            success,
            attempted_at,
        )
    }

    /// Lists the login attempts recorded for a username, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_login_attempts(
        &mut self,
        username: &str,
    ) -> Result<Vec<LoginAttemptData>, PersistenceError> {
        queries::login_log::list_login_attempts(&mut self.conn, username)
    }

    // ========================================================================
    // Deliveries
    // ========================================================================

    /// Inserts a delivery record.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_delivery(&mut self, delivery: &NewDelivery) -> Result<i64, PersistenceError> {
        mutations::deliveries::insert_delivery(&mut self.conn, delivery)
    }

    /// Retrieves one delivery of a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_delivery(
        &mut self,
        tenant_id: i64,
        delivery_id: i64,
    ) -> Result<Option<DeliveryData>, PersistenceError> {
        queries::deliveries::get_delivery(&mut self.conn, tenant_id, delivery_id)
    }

    /// Lists a user's deliveries in a tenant, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_deliveries_for_user(
        &mut self,
        tenant_id: i64,
        username: &Username,
    ) -> Result<Vec<DeliveryData>, PersistenceError> {
        queries::deliveries::list_deliveries_for_user(&mut self.conn, tenant_id, username)
    }

    /// Lists all deliveries of a tenant, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_deliveries_for_tenant(
        &mut self,
        tenant_id: i64,
    ) -> Result<Vec<DeliveryData>, PersistenceError> {
        queries::deliveries::list_deliveries_for_tenant(&mut self.conn, tenant_id)
    }

    /// Closes every non-closed record matching the predicate.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn close_batch(&mut self, predicate: &ClosePredicate) -> Result<usize, PersistenceError> {
        mutations::deliveries::close_batch(&mut self.conn, predicate)
    }

    /// Builds the per-user usage report for a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn usage_for_tenant(&mut self, tenant_id: i64) -> Result<Vec<UsageData>, PersistenceError> {
        queries::usage::usage_for_tenant(&mut self.conn, tenant_id)
    }
}
