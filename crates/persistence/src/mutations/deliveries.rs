// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Delivery record mutations.
//!
//! Records are only ever inserted or moved to `Closed`. No other field
//! is updated after insertion.

use diesel::SqliteConnection;
use diesel::prelude::*;
use entregas_domain::{ClosePredicate, DeliveryStatus, day_bounds};
use tracing::info;

use crate::backend::get_last_insert_rowid;
use crate::data_models::NewDelivery;
use crate::diesel_schema::deliveries;
use crate::error::PersistenceError;

/// Inserts a delivery record and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_delivery(
    conn: &mut SqliteConnection,
    delivery: &NewDelivery,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(deliveries::table)
        .values((
            deliveries::tenant_id.eq(delivery.tenant_id),
            deliveries::user_id.eq(delivery.user_id),
            deliveries::entregador.eq(&delivery.entregador),
            deliveries::client_name.eq(&delivery.client_name),
            deliveries::address.eq(&delivery.address),
            deliveries::client_email.eq(delivery.client_email.as_deref()),
            deliveries::client_phone.eq(delivery.client_phone.as_deref()),
            deliveries::status.eq(delivery.status.as_str()),
            deliveries::note.eq(&delivery.note),
            deliveries::tracking_code.eq(delivery.tracking_code.as_deref()),
            deliveries::photo.eq(delivery.photo.as_deref()),
            deliveries::signature.eq(delivery.signature.as_deref()),
            deliveries::created_at.eq(&delivery.created_at),
        ))
        .execute(conn)?;

    let delivery_id: i64 = get_last_insert_rowid(conn)?;
    info!(
        delivery_id,
        tenant_id = delivery.tenant_id,
        entregador = %delivery.entregador,
        "Delivery recorded"
    );
    Ok(delivery_id)
}

/// Moves every matching record whose status may transition to `Closed`.
///
/// Records already closed are not a valid source, so repeating a close
/// changes nothing.
///
/// # Returns
///
/// The number of records whose status changed.
///
/// # Errors
///
/// Returns an error if the day range cannot be computed or the update
/// fails.
pub fn close_batch(
    conn: &mut SqliteConnection,
    predicate: &ClosePredicate,
) -> Result<usize, PersistenceError> {
    let closed: &str = DeliveryStatus::Closed.as_str();
    let closable: Vec<&str> = DeliveryStatus::sources_of(DeliveryStatus::Closed)
        .iter()
        .map(DeliveryStatus::as_str)
        .collect();

    let changed: usize = match predicate {
        ClosePredicate::DayForTenant { tenant_id, day } => {
            let (start, end) =
                day_bounds(*day).map_err(|e| PersistenceError::Other(e.to_string()))?;
            diesel::update(deliveries::table)
                .filter(deliveries::tenant_id.eq(*tenant_id))
                .filter(deliveries::created_at.ge(start))
                .filter(deliveries::created_at.lt(end))
                .filter(deliveries::status.eq_any(closable))
                .set(deliveries::status.eq(closed))
                .execute(conn)?
        }
        ClosePredicate::AllForUser {
            tenant_id,
            username,
        } => diesel::update(deliveries::table)
            .filter(deliveries::tenant_id.eq(*tenant_id))
            .filter(deliveries::entregador.eq(username.value()))
            .filter(deliveries::status.eq_any(closable))
            .set(deliveries::status.eq(closed))
            .execute(conn)?,
    };

    info!(
        tenant_id = predicate.tenant_id(),
        changed, "Closed delivery batch"
    );
    Ok(changed)
}
