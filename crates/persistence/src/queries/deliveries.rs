// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Delivery record listings.
//!
//! Listings are ordered newest first. Records sharing a timestamp fall
//! back to insertion order, newest first as well.

use std::str::FromStr;

use diesel::SqliteConnection;
use diesel::prelude::*;
use entregas_domain::{DeliveryStatus, Username};
use tracing::debug;

use crate::data_models::DeliveryData;
use crate::diesel_schema::deliveries;
use crate::error::PersistenceError;

/// Diesel Queryable struct for delivery rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = deliveries)]
struct DeliveryRow {
    delivery_id: i64,
    tenant_id: i64,
    user_id: i64,
    entregador: String,
    client_name: String,
    address: String,
    client_email: Option<String>,
    client_phone: Option<String>,
    status: String,
    note: String,
    tracking_code: Option<String>,
    photo: Option<Vec<u8>>,
    signature: Option<Vec<u8>>,
    created_at: String,
}

impl TryFrom<DeliveryRow> for DeliveryData {
    type Error = PersistenceError;

    fn try_from(row: DeliveryRow) -> Result<Self, Self::Error> {
        let status: DeliveryStatus = DeliveryStatus::from_str(&row.status).map_err(|e| {
            PersistenceError::CorruptRecord(format!("delivery {}: {e}", row.delivery_id))
        })?;

        Ok(Self {
            delivery_id: row.delivery_id,
            tenant_id: row.tenant_id,
            user_id: row.user_id,
            entregador: row.entregador,
            client_name: row.client_name,
            address: row.address,
            client_email: row.client_email,
            client_phone: row.client_phone,
            status,
            note: row.note,
            tracking_code: row.tracking_code,
            photo: row.photo,
            signature: row.signature,
            created_at: row.created_at,
        })
    }
}

fn into_records(rows: Vec<DeliveryRow>) -> Result<Vec<DeliveryData>, PersistenceError> {
    rows.into_iter().map(DeliveryData::try_from).collect()
}

/// Lists the deliveries recorded by one user inside one tenant.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored status is
/// not recognized.
pub fn list_deliveries_for_user(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    username: &Username,
) -> Result<Vec<DeliveryData>, PersistenceError> {
    debug!(
        "Listing deliveries for user {} in tenant {}",
        username, tenant_id
    );

    let rows: Vec<DeliveryRow> = deliveries::table
        .filter(deliveries::tenant_id.eq(tenant_id))
        .filter(deliveries::entregador.eq(username.value()))
        .order((deliveries::created_at.desc(), deliveries::delivery_id.desc()))
        .select(DeliveryRow::as_select())
        .load(conn)?;

    into_records(rows)
}

/// Lists every delivery of one tenant.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored status is
/// not recognized.
pub fn list_deliveries_for_tenant(
    conn: &mut SqliteConnection,
    tenant_id: i64,
) -> Result<Vec<DeliveryData>, PersistenceError> {
    debug!("Listing deliveries for tenant {}", tenant_id);

    let rows: Vec<DeliveryRow> = deliveries::table
        .filter(deliveries::tenant_id.eq(tenant_id))
        .order((deliveries::created_at.desc(), deliveries::delivery_id.desc()))
        .select(DeliveryRow::as_select())
        .load(conn)?;

    into_records(rows)
}

/// Retrieves one delivery, scoped to a tenant.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the delivery does not exist in this tenant.
pub fn get_delivery(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    delivery_id: i64,
) -> Result<Option<DeliveryData>, PersistenceError> {
    deliveries::table
        .filter(deliveries::tenant_id.eq(tenant_id))
        .filter(deliveries::delivery_id.eq(delivery_id))
        .select(DeliveryRow::as_select())
        .first(conn)
        .optional()?
        .map(DeliveryData::try_from)
        .transpose()
}
