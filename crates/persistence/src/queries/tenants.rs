// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::TenantData;
use crate::diesel_schema::tenants;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = tenants)]
struct TenantRow {
    tenant_id: i64,
    name: String,
    created_at: String,
}

impl From<TenantRow> for TenantData {
    fn from(row: TenantRow) -> Self {
        Self {
            tenant_id: row.tenant_id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

/// Retrieves a tenant by its exact name.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no tenant has this name.
pub fn get_tenant_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Option<TenantData>, PersistenceError> {
    debug!("Looking up tenant by name: {}", name);

    let row: Option<TenantRow> = tenants::table
        .filter(tenants::name.eq(name))
        .select(TenantRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(TenantData::from))
}

/// Retrieves a tenant by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the tenant is not found.
pub fn get_tenant_by_id(
    conn: &mut SqliteConnection,
    tenant_id: i64,
) -> Result<Option<TenantData>, PersistenceError> {
    let row: Option<TenantRow> = tenants::table
        .filter(tenants::tenant_id.eq(tenant_id))
        .select(TenantRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(TenantData::from))
}
