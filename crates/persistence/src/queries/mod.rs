// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `tenants` — Tenant lookups
//! - `users` — Account lookups and password verification
//! - `sessions` — Session lookups
//! - `deliveries` — Tenant-scoped delivery listings
//! - `login_log` — Login attempt history
//! - `usage` — Per-user activity counters
//!
//! Every delivery query takes a tenant id. There is no query that reads
//! deliveries across tenants.

pub mod deliveries;
pub mod login_log;
pub mod sessions;
pub mod tenants;
pub mod usage;
pub mod users;
