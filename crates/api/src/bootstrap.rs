// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! First-run bootstrap.

use entregas_domain::{Role, Username, validate_tenant_name};
use entregas_persistence::{Persistence, TenantData};
use tracing::info;

use crate::auth::{AuthSettings, DEFAULT_ADMIN_USERNAME};
use crate::error::ApiError;

/// What a bootstrap run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOutcome {
    /// The default tenant id.
    pub tenant_id: i64,
    /// Whether the default admin was created by this run.
    pub admin_created: bool,
}

/// Ensures the default tenant and the default admin exist.
///
/// Running this on an already bootstrapped store changes nothing. An
/// existing admin keeps its password.
///
/// # Errors
///
/// Returns an error if the tenant name is invalid or the store fails.
pub fn bootstrap_defaults(
    persistence: &mut Persistence,
    settings: &AuthSettings,
) -> Result<BootstrapOutcome, ApiError> {
    validate_tenant_name(&settings.default_tenant)?;

    let tenant: TenantData = persistence.ensure_tenant(settings.default_tenant.trim())?;
    let admin: Username = Username::new(DEFAULT_ADMIN_USERNAME);

    if persistence.get_user_by_username(&admin)?.is_some() {
        return Ok(BootstrapOutcome {
            tenant_id: tenant.tenant_id,
            admin_created: false,
        });
    }

    persistence.create_user(
        tenant.tenant_id,
        &admin,
        &settings.admin_password,
        Role::Admin,
        None,
    )?;

    info!(
        tenant = %tenant.name,
        username = DEFAULT_ADMIN_USERNAME,
        "Created default admin"
    );

    Ok(BootstrapOutcome {
        tenant_id: tenant.tenant_id,
        admin_created: true,
    })
}
