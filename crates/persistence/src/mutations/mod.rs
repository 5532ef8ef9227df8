// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! Mutations use the Diesel DSL throughout. The only raw SQL lives in
//! [`crate::backend`] for PRAGMA handling and `last_insert_rowid()`.

pub mod deliveries;
pub mod login_log;
pub mod sessions;
pub mod tenants;
pub mod users;
