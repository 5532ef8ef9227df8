// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Delivery confirmation notifications.
//!
//! Notification is best-effort. A failed notification is logged and never
//! undoes the recorded delivery.

use std::path::{Path, PathBuf};

use entregas_domain::parse_timestamp;
use thiserror::Error;
use time::format_description::well_known::Rfc2822;
use tracing::{debug, info, warn};

use crate::request_response::DeliveryRecord;

/// Notification errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The message could not be written to the spool directory.
    #[error("Failed to write spool file '{path}': {source}")]
    Spool {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The message could not be rendered.
    #[error("Failed to render message: {0}")]
    Render(String),
}

/// A sink for delivery confirmations.
pub trait DeliveryNotifier: Send + Sync {
    /// Sends the confirmation for a freshly recorded delivery.
    ///
    /// # Errors
    ///
    /// Returns an error if the confirmation could not be handed off.
    fn notify_delivery(&self, record: &DeliveryRecord) -> Result<(), NotifyError>;
}

/// Invokes the notifier and logs any failure at `warn`.
pub fn notify_best_effort(notifier: &dyn DeliveryNotifier, record: &DeliveryRecord) {
    if let Err(e) = notifier.notify_delivery(record) {
        warn!(
            delivery_id = record.delivery_id,
            "Delivery confirmation not sent: {e}"
        );
    }
}

/// Records confirmations in the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl DeliveryNotifier for LogNotifier {
    fn notify_delivery(&self, record: &DeliveryRecord) -> Result<(), NotifyError> {
        info!(
            delivery_id = record.delivery_id,
            tracking_code = record.tracking_code.as_deref().unwrap_or(""),
            client_email = record.client_email.as_deref().unwrap_or(""),
            status = %record.status,
            "Delivery confirmation"
        );
        Ok(())
    }
}

/// Writes confirmations as RFC 5322 messages into a spool directory.
///
/// An external mail transfer agent picks the files up. Records without a
/// client email are skipped.
#[derive(Debug, Clone)]
pub struct SpoolNotifier {
    spool_dir: PathBuf,
    from: String,
}

impl SpoolNotifier {
    /// Creates a notifier writing into `spool_dir` with the given sender.
    #[must_use]
    pub fn new(spool_dir: impl Into<PathBuf>, from: impl Into<String>) -> Self {
        Self {
            spool_dir: spool_dir.into(),
            from: from.into(),
        }
    }

    /// The directory messages are written to.
    #[must_use]
    pub fn spool_dir(&self) -> &Path {
        &self.spool_dir
    }

    /// Renders the confirmation message for a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record timestamp cannot be parsed or
    /// formatted as a message date.
    pub fn render_message(&self, record: &DeliveryRecord, to: &str) -> Result<String, NotifyError> {
        let date: String = parse_timestamp(&record.created_at)
            .map_err(|e| NotifyError::Render(e.to_string()))?
            .format(&Rfc2822)
            .map_err(|e| NotifyError::Render(e.to_string()))?;

        let tracking: &str = record.tracking_code.as_deref().unwrap_or("-");

        Ok(format!(
            "From: {from}\r\n\
             To: {to}\r\n\
             Date: {date}\r\n\
             Subject: Entrega registrada {tracking}\r\n\
             Content-Type: text/plain; charset=utf-8\r\n\
             \r\n\
             Ola {client},\r\n\
             \r\n\
             Sua entrega para {address} foi registrada.\r\n\
             Codigo de rastreio: {tracking}\r\n\
             Status: {status}\r\n",
            from = header_value(&self.from),
            to = header_value(to),
            tracking = header_value(tracking),
            client = record.client_name,
            address = record.address,
            status = record.status,
        ))
    }
}

impl DeliveryNotifier for SpoolNotifier {
    fn notify_delivery(&self, record: &DeliveryRecord) -> Result<(), NotifyError> {
        let Some(to) = record.client_email.as_deref() else {
            debug!(
                delivery_id = record.delivery_id,
                "No client email, skipping confirmation"
            );
            return Ok(());
        };

        let message: String = self.render_message(record, to)?;
        let path: PathBuf = self
            .spool_dir
            .join(format!("delivery-{}.eml", record.delivery_id));

        std::fs::create_dir_all(&self.spool_dir)
            .and_then(|()| std::fs::write(&path, message))
            .map_err(|source| NotifyError::Spool {
                path: path.display().to_string(),
                source,
            })?;

        info!(
            delivery_id = record.delivery_id,
            path = %path.display(),
            "Delivery confirmation spooled"
        );
        Ok(())
    }
}

/// Strips line breaks so a value cannot inject extra headers.
fn header_value(value: &str) -> String {
    value.chars().filter(|c| !matches!(c, '\r' | '\n')).collect()
}
