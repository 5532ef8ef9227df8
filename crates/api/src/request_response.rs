// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use entregas_domain::{DeliveryStatus, Role};
use entregas_persistence::{DeliveryData, UsageData, UserData};
use serde::{Deserialize, Serialize};

/// API request to register a new delivery account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    /// The desired username (case-folded on registration).
    pub username: String,
    /// The password.
    pub password: String,
    /// The password confirmation.
    pub password_confirmation: String,
    /// Optional contact phone.
    #[serde(default)]
    pub phone: Option<String>,
}

/// API response for a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// The new account id.
    pub user_id: i64,
    /// The stored (case-folded) username.
    pub username: String,
    /// The tenant the account joined.
    pub tenant_name: String,
    /// The account role.
    pub role: Role,
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    /// The username.
    pub username: String,
    /// The password.
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The bearer token for subsequent requests.
    pub session_token: String,
    /// The case-folded username.
    pub username: String,
    /// The account role.
    pub role: Role,
    /// The tenant id.
    pub tenant_id: i64,
    /// When the session expires (UTC).
    pub expires_at: String,
}

/// API response describing the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub tenant_id: i64,
    pub tenant_name: String,
}

/// API request to record a delivery.
///
/// Attachments arrive here as raw bytes; transport encodings are removed
/// at the HTTP boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateDeliveryRequest {
    /// The client name (required).
    pub client_name: String,
    /// The delivery address (required).
    pub address: String,
    /// Optional client email.
    pub client_email: Option<String>,
    /// Optional client phone.
    pub client_phone: Option<String>,
    /// The initial status; `Pending` when absent.
    pub status: Option<String>,
    /// Optional free-text note.
    pub note: Option<String>,
    /// Optional tracking code; generated when absent.
    pub tracking_code: Option<String>,
    /// Optional photo bytes.
    pub photo: Option<Vec<u8>>,
    /// Optional signature bytes.
    pub signature: Option<Vec<u8>>,
}

/// A delivery record as shown to clients.
///
/// Attachment bytes are not returned, only whether they are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub delivery_id: i64,
    pub entregador: String,
    pub client_name: String,
    pub address: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub status: DeliveryStatus,
    pub note: String,
    pub tracking_code: Option<String>,
    pub has_photo: bool,
    pub has_signature: bool,
    pub created_at: String,
}

impl From<DeliveryData> for DeliveryRecord {
    fn from(data: DeliveryData) -> Self {
        Self {
            delivery_id: data.delivery_id,
            entregador: data.entregador,
            client_name: data.client_name,
            address: data.address,
            client_email: data.client_email,
            client_phone: data.client_phone,
            status: data.status,
            note: data.note,
            tracking_code: data.tracking_code,
            has_photo: data.photo.is_some(),
            has_signature: data.signature.is_some(),
            created_at: data.created_at,
        }
    }
}

/// API response for a successful delivery creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDeliveryResponse {
    /// The stored record.
    pub delivery: DeliveryRecord,
    /// A success message.
    pub message: String,
}

/// API response listing delivery records, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDeliveriesResponse {
    pub deliveries: Vec<DeliveryRecord>,
}

/// API request to close every record of one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CloseDayRequest {
    /// The UTC day as `YYYY-MM-DD`; today when absent.
    #[serde(default)]
    pub day: Option<String>,
}

/// API response for a bulk close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseBatchResponse {
    /// Number of records moved to `Closed`.
    pub closed: usize,
    /// A success message.
    pub message: String,
}

/// A spreadsheet export ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    /// Suggested download file name.
    pub file_name: String,
    /// CSV bytes.
    pub content: Vec<u8>,
    /// Number of records exported.
    pub row_count: usize,
}

/// API request for an admin to create an account in its tenant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub password_confirmation: String,
    /// `admin` or `entregador`.
    pub role: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// API response for a successful account creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub message: String,
}

/// Account information for the admin listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub phone: Option<String>,
    pub created_at: String,
}

impl From<UserData> for UserInfo {
    fn from(data: UserData) -> Self {
        Self {
            user_id: data.user_id,
            username: data.username,
            role: data.role,
            phone: data.phone,
            created_at: data.created_at,
        }
    }
}

/// API response listing the accounts of a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserInfo>,
}

/// API response for a successful account deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    pub user_id: i64,
    pub message: String,
}

/// Activity counters for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEntry {
    pub username: String,
    pub role: Role,
    pub pending: u64,
    pub delivered: u64,
    pub closed: u64,
    pub total_deliveries: u64,
    pub successful_logins: u64,
}

impl From<UsageData> for UsageEntry {
    fn from(data: UsageData) -> Self {
        Self {
            total_deliveries: data.total_deliveries(),
            username: data.username,
            role: data.role,
            pending: data.pending,
            delivered: data.delivered,
            closed: data.closed,
            successful_logins: data.successful_logins,
        }
    }
}

/// API response with the usage report of a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageResponse {
    pub users: Vec<UsageEntry>,
}
