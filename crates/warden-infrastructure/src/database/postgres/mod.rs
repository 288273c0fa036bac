//! PostgreSQL repository implementations
//!
//! Statements on tenant-owned tables carry `($n::uuid IS NULL OR tenant_id = $n)`,
//! bound to the scope's tenant (`NULL` for an unrestricted scope).

pub mod organization_repo_impl;
pub mod role_repo_impl;
pub mod tenant_repo_impl;
pub mod user_repo_impl;

pub use organization_repo_impl::PgOrganizationRepository;
pub use role_repo_impl::PgRoleRepository;
pub use tenant_repo_impl::PgTenantRepository;
pub use user_repo_impl::PgUserRepository;

use tracing::error;
use uuid::Uuid;

use warden_core::repositories::QueryScope;
use warden_core::DomainError;

/// Name of the violated unique constraint, if `e` is a unique violation (23505).
pub(crate) fn unique_violation(e: &sqlx::Error) -> Option<String> {
    let db_err = e.as_database_error()?;
    if db_err.code().as_deref() == Some("23505") {
        Some(db_err.constraint().unwrap_or_default().to_string())
    } else {
        None
    }
}

pub(crate) fn database_error(operation: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", operation, e);
    DomainError::Database(e.to_string())
}

pub(crate) fn scope_param(scope: &QueryScope) -> Option<Uuid> {
    scope.tenant().map(Uuid::from)
}
