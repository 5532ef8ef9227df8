// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use entregas_domain::{Role, Username};
use tracing::info;

use crate::backend::get_last_insert_rowid;
use crate::diesel_schema::users;
use crate::error::PersistenceError;
use crate::queries::users::get_user_by_username;

/// Creates a user inside a tenant.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `tenant_id` - The owning tenant
/// * `username` - The case-folded username
/// * `password` - The plain-text password (will be hashed)
/// * `role` - The account role
/// * `phone` - Optional contact phone
/// * `bcrypt_cost` - The bcrypt work factor
///
/// # Errors
///
/// Returns `DuplicateUsername` if the username is already taken, or an
/// error if hashing or the insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    username: &Username,
    password: &str,
    role: Role,
    phone: Option<&str>,
    bcrypt_cost: u32,
) -> Result<i64, PersistenceError> {
    info!(
        "Creating user {} with role {} in tenant {}",
        username, role, tenant_id
    );

    if get_user_by_username(conn, username)?.is_some() {
        return Err(PersistenceError::DuplicateUsername(
            username.value().to_string(),
        ));
    }

    let password_hash: String = bcrypt::hash(password, bcrypt_cost)
        .map_err(|e| PersistenceError::PasswordHash(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(users::table)
        .values((
            users::username.eq(username.value()),
            users::password_hash.eq(&password_hash),
            users::tenant_id.eq(tenant_id),
            users::role.eq(role.as_str()),
            users::phone.eq(phone),
        ))
        .execute(conn)
        .map_err(|e| match PersistenceError::from(e) {
            PersistenceError::UniqueViolation(_) => {
                PersistenceError::DuplicateUsername(username.value().to_string())
            }
            other => other,
        })?;

    let user_id: i64 = get_last_insert_rowid(conn)?;
    info!(user_id, "User created successfully");
    Ok(user_id)
}

/// Deletes a user from a tenant.
///
/// The user's deliveries and sessions are removed by the foreign key
/// cascades.
///
/// # Errors
///
/// Returns `UserNotFound` if no user with this id exists in the tenant.
pub fn delete_user(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    user_id: i64,
) -> Result<(), PersistenceError> {
    info!("Deleting user {} from tenant {}", user_id, tenant_id);

    let rows: usize = diesel::delete(users::table)
        .filter(users::tenant_id.eq(tenant_id))
        .filter(users::user_id.eq(user_id))
        .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::UserNotFound(format!(
            "user {user_id} in tenant {tenant_id}"
        )));
    }

    Ok(())
}
