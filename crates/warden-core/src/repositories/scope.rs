//! Query scope handed to repository adapters.

use warden_shared::TenantId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScope {
    /// No tenant predicate. Only used before a filter is installed (public and
    /// skip-tenant routes, principal resolution) or for non-tenant-owned kinds.
    Unrestricted,
    /// Every statement is conjoined with `tenant_id = <id>`.
    Tenant(TenantId),
}

impl QueryScope {
    pub fn tenant(&self) -> Option<TenantId> {
        match self {
            QueryScope::Unrestricted => None,
            QueryScope::Tenant(id) => Some(*id),
        }
    }

    /// Whether a record owned by `owner` is visible under this scope.
    pub fn admits(&self, owner: Option<TenantId>) -> bool {
        match self {
            QueryScope::Unrestricted => true,
            QueryScope::Tenant(id) => owner == Some(*id),
        }
    }
}
