// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use entregas_domain::{DeliveryStatus, Role};
use serde::{Deserialize, Serialize};

/// A tenant (company) row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantData {
    pub tenant_id: i64,
    pub name: String,
    pub created_at: String,
}

/// A user account row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub user_id: i64,
    /// Case-folded login name.
    pub username: String,
    pub password_hash: String,
    pub tenant_id: i64,
    pub role: Role,
    pub phone: Option<String>,
    pub created_at: String,
}

/// A session row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// Input for inserting a delivery record.
///
/// Tenant and author are taken from the session of the person recording
/// the delivery and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDelivery {
    pub tenant_id: i64,
    pub user_id: i64,
    pub entregador: String,
    pub client_name: String,
    pub address: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub status: DeliveryStatus,
    pub note: String,
    pub tracking_code: Option<String>,
    pub photo: Option<Vec<u8>>,
    pub signature: Option<Vec<u8>>,
    pub created_at: String,
}

/// A delivery record row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryData {
    pub delivery_id: i64,
    pub tenant_id: i64,
    pub user_id: i64,
    pub entregador: String,
    pub client_name: String,
    pub address: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub status: DeliveryStatus,
    pub note: String,
    pub tracking_code: Option<String>,
    pub photo: Option<Vec<u8>>,
    pub signature: Option<Vec<u8>>,
    pub created_at: String,
}

/// A login attempt row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAttemptData {
    pub log_id: i64,
    pub username: String,
    /// The account the username resolved to, if any.
    pub user_id: Option<i64>,
    pub success: bool,
    pub attempted_at: String,
}

/// Per-user activity counters for one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageData {
    pub username: String,
    pub role: Role,
    pub pending: u64,
    pub delivered: u64,
    pub closed: u64,
    pub successful_logins: u64,
}

impl UsageData {
    /// Total deliveries recorded by this user.
    #[must_use]
    pub const fn total_deliveries(&self) -> u64 {
        self.pending + self.delivered + self.closed
    }
}
