// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::get_last_insert_rowid;
use crate::data_models::TenantData;
use crate::diesel_schema::tenants;
use crate::error::PersistenceError;
use crate::queries::tenants::{get_tenant_by_id, get_tenant_by_name};

/// Creates a tenant.
///
/// # Errors
///
/// Returns an error if the insert fails or a tenant with this name
/// already exists.
pub fn create_tenant(conn: &mut SqliteConnection, name: &str) -> Result<i64, PersistenceError> {
    info!("Creating tenant: {}", name);

    diesel::insert_into(tenants::table)
        .values(tenants::name.eq(name))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Returns the tenant with the given name, creating it when missing.
///
/// # Errors
///
/// Returns an error if a query or the insert fails.
pub fn ensure_tenant(conn: &mut SqliteConnection, name: &str) -> Result<TenantData, PersistenceError> {
    if let Some(existing) = get_tenant_by_name(conn, name)? {
        return Ok(existing);
    }

    let tenant_id: i64 = create_tenant(conn, name)?;
    get_tenant_by_id(conn, tenant_id)?
        .ok_or_else(|| PersistenceError::TenantNotFound(format!("tenant {tenant_id}")))
}
