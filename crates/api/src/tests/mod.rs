// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test module for the API crate.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod admin_tests;
mod auth_tests;
mod bootstrap_tests;
mod export_tests;
mod helpers;
mod notify_tests;
