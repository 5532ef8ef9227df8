// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account queries.

use std::str::FromStr;

use diesel::SqliteConnection;
use diesel::prelude::*;
use entregas_domain::{Role, Username};
use tracing::debug;

use crate::data_models::UserData;
use crate::diesel_schema::users;
use crate::error::PersistenceError;

/// Diesel Queryable struct for user rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
struct UserRow {
    user_id: i64,
    username: String,
    password_hash: String,
    tenant_id: i64,
    role: String,
    phone: Option<String>,
    created_at: String,
}

impl TryFrom<UserRow> for UserData {
    type Error = PersistenceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = Role::from_str(&row.role).map_err(|e| {
            PersistenceError::CorruptRecord(format!("user {}: {e}", row.user_id))
        })?;

        Ok(Self {
            user_id: row.user_id,
            username: row.username,
            password_hash: row.password_hash,
            tenant_id: row.tenant_id,
            role,
            phone: row.phone,
            created_at: row.created_at,
        })
    }
}

/// Retrieves a user by username.
///
/// The lookup is case-insensitive because [`Username`] is case-folded.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_username(
    conn: &mut SqliteConnection,
    username: &Username,
) -> Result<Option<UserData>, PersistenceError> {
    debug!("Looking up user by username: {}", username);

    users::table
        .filter(users::username.eq(username.value()))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?
        .map(UserData::try_from)
        .transpose()
}

/// Retrieves a user by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<UserData>, PersistenceError> {
    debug!("Looking up user by ID: {}", user_id);

    users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?
        .map(UserData::try_from)
        .transpose()
}

/// Lists the users of one tenant, ordered by username.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_users_for_tenant(
    conn: &mut SqliteConnection,
    tenant_id: i64,
) -> Result<Vec<UserData>, PersistenceError> {
    debug!("Listing users for tenant {}", tenant_id);

    users::table
        .filter(users::tenant_id.eq(tenant_id))
        .order(users::username.asc())
        .select(UserRow::as_select())
        .load(conn)?
        .into_iter()
        .map(UserData::try_from)
        .collect()
}

/// Counts all users.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_users(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(users::table.count().get_result(conn)?)
}

/// Verifies a password against a stored bcrypt hash.
///
/// # Errors
///
/// Returns an error if the stored hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::PasswordHash(format!("Failed to verify password: {e}")))
}
