// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod timestamp;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use timestamp::{day_bounds, format_day, format_timestamp, parse_day, parse_timestamp};
pub use types::{ClosePredicate, DeliveryStatus, Role, Username};
pub use validation::{
    validate_delivery_fields, validate_initial_status, validate_tenant_name, validate_username,
};
