// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Spreadsheet export of delivery records.
//!
//! The export is plain CSV with a fixed header so that it opens directly
//! in any spreadsheet program. Serialization is pure: it takes a slice of
//! records and returns bytes.

use csv::StringRecord;
use entregas_domain::{DeliveryStatus, DomainError, format_day};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::Date;

use crate::request_response::DeliveryRecord;

/// Column names, in order.
pub const EXPORT_HEADER: [&str; 12] = [
    "id",
    "client_name",
    "address",
    "client_email",
    "client_phone",
    "status",
    "note",
    "created_at",
    "entregador",
    "tracking_code",
    "has_photo",
    "has_signature",
];

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A row could not be written or read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The writer could not hand back its buffer.
    #[error("Failed to finish CSV output: {0}")]
    Flush(String),

    /// The input does not start with the export header.
    #[error("Unexpected CSV header: {0}")]
    UnexpectedHeader(String),
}

/// One exported row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub id: i64,
    pub client_name: String,
    pub address: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub status: DeliveryStatus,
    pub note: String,
    pub created_at: String,
    pub entregador: String,
    pub tracking_code: Option<String>,
    pub has_photo: bool,
    pub has_signature: bool,
}

impl From<&DeliveryRecord> for ExportRow {
    fn from(record: &DeliveryRecord) -> Self {
        Self {
            id: record.delivery_id,
            client_name: record.client_name.clone(),
            address: record.address.clone(),
            client_email: record.client_email.clone(),
            client_phone: record.client_phone.clone(),
            status: record.status,
            note: record.note.clone(),
            created_at: record.created_at.clone(),
            entregador: record.entregador.clone(),
            tracking_code: record.tracking_code.clone(),
            has_photo: record.has_photo,
            has_signature: record.has_signature,
        }
    }
}

/// Serializes a slice of records to CSV bytes.
///
/// The header row is always written, even for an empty slice.
///
/// # Errors
///
/// Returns an error if a row cannot be serialized.
pub fn export_slice(records: &[DeliveryRecord]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADER)?;
    for record in records {
        writer.serialize(ExportRow::from(record))?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))
}

/// Reads an export back into rows.
///
/// # Errors
///
/// Returns an error if the header differs from [`EXPORT_HEADER`] or a
/// row cannot be parsed.
pub fn parse_export(bytes: &[u8]) -> Result<Vec<ExportRow>, ExportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let header: &StringRecord = reader.headers()?;
    if header.iter().ne(EXPORT_HEADER) {
        return Err(ExportError::UnexpectedHeader(
            header.iter().collect::<Vec<&str>>().join(","),
        ));
    }

    reader
        .deserialize::<ExportRow>()
        .map(|row| row.map_err(ExportError::from))
        .collect()
}

/// Builds the download name `entregas-<scope>-<YYYY-MM-DD>.csv`.
///
/// # Errors
///
/// Returns an error if the day cannot be formatted.
pub fn export_file_name(scope: &str, day: Date) -> Result<String, DomainError> {
    Ok(format!("entregas-{scope}-{}.csv", format_day(day)?))
}
