//! Tenant scope filter installer.

use tracing::{debug, error};

use super::context;
use crate::domain::{Principal, TenantId};
use crate::error::{DomainError, DomainResult};
use crate::session::DataSession;

/// Per-route access declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// No credential, no filter.
    Public,
    /// Credential required, filter installed.
    Authenticated,
    /// Credential required, filter skipped. For routes touching no tenant-owned kind.
    SkipTenantScope,
}

impl RouteAccess {
    pub fn requires_principal(&self) -> bool {
        !matches!(self, RouteAccess::Public)
    }

    pub fn is_scoped(&self) -> bool {
        matches!(self, RouteAccess::Authenticated)
    }
}

/// The standing predicate `tenant_id = <tenant>` on a data session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantFilter {
    tenant_id: TenantId,
}

impl TenantFilter {
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// Installs the tenant filter on `session` for scoped routes.
///
/// Must run after the principal resolver has bound the tenant. Public and
/// skip-tenant routes leave the session unrestricted.
pub fn install_tenant_filter(
    session: &mut DataSession,
    access: RouteAccess,
    principal: Option<&Principal>,
) -> DomainResult<()> {
    if !access.is_scoped() {
        return Ok(());
    }

    let principal = principal.ok_or(DomainError::PrincipalMissing)?;
    let Some(own_tenant) = principal.tenant_id else {
        error!(target: "warden::tenancy", user_id = %principal.user_id, "Principal has no tenant");
        return Err(DomainError::MissingTenantContext);
    };

    let tenant_id = context::require_tenant()?;
    if tenant_id != own_tenant {
        error!(
            target: "warden::tenancy",
            user_id = %principal.user_id,
            "Request context tenant differs from principal tenant"
        );
        return Err(DomainError::MissingTenantContext);
    }

    session.install_filter(TenantFilter { tenant_id });
    debug!(tenant_id = %tenant_id, "Tenant filter installed");
    Ok(())
}
