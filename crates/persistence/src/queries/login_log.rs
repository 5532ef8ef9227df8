// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::LoginAttemptData;
use crate::diesel_schema::login_logs;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = login_logs)]
struct LoginLogRow {
    log_id: i64,
    username: String,
    user_id: Option<i64>,
    success: i32,
    attempted_at: String,
}

/// Lists the recorded login attempts for a username, oldest first.
///
/// The username is matched exactly as it was recorded.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_login_attempts(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Vec<LoginAttemptData>, PersistenceError> {
    let rows: Vec<LoginLogRow> = login_logs::table
        .filter(login_logs::username.eq(username))
        .order(login_logs::log_id.asc())
        .select(LoginLogRow::as_select())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|row| LoginAttemptData {
            log_id: row.log_id,
            username: row.username,
            user_id: row.user_id,
            success: row.success != 0,
            attempted_at: row.attempted_at,
        })
        .collect())
}
