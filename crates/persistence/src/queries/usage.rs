// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-user activity counters for the admin usage report.
//!
//! Both counters are aggregated in SQL and keyed by account id, so an
//! account recreated under a deleted account's username starts from zero.

use std::collections::HashMap;
use std::str::FromStr;

use diesel::SqliteConnection;
use diesel::dsl::count_star;
use diesel::prelude::*;
use entregas_domain::{DeliveryStatus, Role};
use tracing::debug;

use crate::data_models::UsageData;
use crate::diesel_schema::{deliveries, login_logs, users};
use crate::error::PersistenceError;

fn to_counter(count: i64) -> Result<u64, PersistenceError> {
    u64::try_from(count)
        .map_err(|_| PersistenceError::CorruptRecord(format!("negative count {count}")))
}

/// Builds one usage row per user of the tenant, ordered by username.
///
/// Users with no deliveries and no logins still get a row with zero
/// counters.
///
/// # Errors
///
/// Returns an error if a query fails or a stored role or status is not
/// recognized.
pub fn usage_for_tenant(
    conn: &mut SqliteConnection,
    tenant_id: i64,
) -> Result<Vec<UsageData>, PersistenceError> {
    debug!("Computing usage for tenant {}", tenant_id);

    let accounts: Vec<(i64, String, String)> = users::table
        .filter(users::tenant_id.eq(tenant_id))
        .order(users::username.asc())
        .select((users::user_id, users::username, users::role))
        .load(conn)?;

    let mut usage: Vec<UsageData> = Vec::with_capacity(accounts.len());
    let mut position: HashMap<i64, usize> = HashMap::with_capacity(accounts.len());
    for (user_id, username, role) in accounts {
        let role: Role = Role::from_str(&role)
            .map_err(|e| PersistenceError::CorruptRecord(format!("user {username}: {e}")))?;
        position.insert(user_id, usage.len());
        usage.push(UsageData {
            username,
            role,
            pending: 0,
            delivered: 0,
            closed: 0,
            successful_logins: 0,
        });
    }

    let status_counts: Vec<(i64, String, i64)> = deliveries::table
        .filter(deliveries::tenant_id.eq(tenant_id))
        .group_by((deliveries::user_id, deliveries::status))
        .select((deliveries::user_id, deliveries::status, count_star()))
        .load(conn)?;

    for (user_id, status, count) in status_counts {
        let Some(entry) = position.get(&user_id).map(|&i| &mut usage[i]) else {
            continue;
        };
        let count: u64 = to_counter(count)?;
        match DeliveryStatus::from_str(&status)
            .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?
        {
            DeliveryStatus::Pending => entry.pending = count,
            DeliveryStatus::Delivered => entry.delivered = count,
            DeliveryStatus::Closed => entry.closed = count,
        }
    }

    let user_ids: Vec<i64> = position.keys().copied().collect();
    let login_counts: Vec<(Option<i64>, i64)> = login_logs::table
        .filter(login_logs::success.eq(1))
        .filter(login_logs::user_id.eq_any(user_ids))
        .group_by(login_logs::user_id)
        .select((login_logs::user_id, count_star()))
        .load(conn)?;

    for (user_id, count) in login_counts {
        if let Some(&i) = user_id.and_then(|id| position.get(&id)) {
            usage[i].successful_logins = to_counter(count)?;
        }
    }

    Ok(usage)
}
