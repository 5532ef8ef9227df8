// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::backend::get_last_insert_rowid;
use crate::diesel_schema::login_logs;
use crate::error::PersistenceError;

/// Appends one login attempt to the log.
///
/// The username is stored as typed so failed attempts against unknown
/// accounts remain visible. `user_id` links the attempt to the account
/// the username resolved to; it is cleared if that account is deleted.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn record_login_attempt(
    conn: &mut SqliteConnection,
    username: &str,
    user_id: Option<i64>,
    success: bool,
    attempted_at: &str,
) -> Result<i64, PersistenceError> {
    debug!("Recording login attempt for {}: success={}", username, success);

    diesel::insert_into(login_logs::table)
        .values((
            login_logs::username.eq(username),
            login_logs::user_id.eq(user_id),
            login_logs::success.eq(i32::from(success)),
            login_logs::attempted_at.eq(attempted_at),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}
