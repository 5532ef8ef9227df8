// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

/// A login name.
///
/// Usernames are trimmed and normalized to lowercase so that uniqueness
/// and lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username {
    value: String,
}

impl Username {
    /// Creates a new `Username`.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw login name (will be trimmed and lowercased)
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_lowercase(),
        }
    }

    /// Returns the normalized username.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// Account roles.
///
/// Every account belongs to exactly one tenant and holds exactly one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Tenant administrator.
    ///
    /// Admins may manage accounts of their own tenant, see every delivery
    /// recorded in the tenant, close a day and read usage statistics.
    Admin,
    /// Delivery person.
    ///
    /// Records deliveries and sees only their own records.
    Entregador,
}

impl Role {
    /// Returns the persisted representation of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Entregador => "entregador",
        }
    }

    /// Returns `true` for the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            // "motorista" is the older name for the same role
            "entregador" | "motorista" => Ok(Self::Entregador),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a delivery record.
///
/// `Closed` is terminal and is only reached through a bulk close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DeliveryStatus {
    /// Recorded but not yet finalized.
    #[default]
    Pending,
    /// Handed over to the client.
    Delivered,
    /// Finalized by a close-day or close-mine action.
    Closed,
}

impl DeliveryStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Delivered, Self::Closed];

    /// Returns the statuses that may move to `target`.
    #[must_use]
    pub fn sources_of(target: Self) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|status| status.can_transition_to(target))
            .collect()
    }

    /// Returns the persisted representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Delivered => "Delivered",
            Self::Closed => "Closed",
        }
    }

    /// Returns `true` if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - `Pending` → `Closed`
    /// - `Delivered` → `Closed`
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending | Self::Delivered, Self::Closed)
        )
    }
}

impl FromStr for DeliveryStatus {
    type Err = DomainError;

    /// Parses a status, accepting the legacy Portuguese labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "pendente" | "não entregue" | "nao entregue" => Ok(Self::Pending),
            "delivered" | "entregue" => Ok(Self::Delivered),
            "closed" | "fechada" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selects the delivery records a bulk close applies to.
///
/// Both variants carry the tenant id, so a close can never reach past
/// the tenant of the session that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClosePredicate {
    /// Every record of the tenant created on the given UTC day.
    DayForTenant {
        /// The tenant scope.
        tenant_id: i64,
        /// The calendar day (UTC).
        day: Date,
    },
    /// Every record of the tenant authored by the given user.
    AllForUser {
        /// The tenant scope.
        tenant_id: i64,
        /// The author of the records.
        username: Username,
    },
}

impl ClosePredicate {
    /// Returns the tenant this predicate is scoped to.
    #[must_use]
    pub const fn tenant_id(&self) -> i64 {
        match self {
            Self::DayForTenant { tenant_id, .. } | Self::AllForUser { tenant_id, .. } => {
                *tenant_id
            }
        }
    }
}
