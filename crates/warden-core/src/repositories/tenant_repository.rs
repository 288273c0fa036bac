//! Tenant repository trait (port)

use async_trait::async_trait;

use crate::domain::{Tenant, TenantId};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn find_by_id(&self, id: &TenantId) -> Result<Option<Tenant>, DomainError>;
    async fn find_by_domain(&self, domain: &str) -> Result<Option<Tenant>, DomainError>;
    /// Fails with `DuplicateConstraint` when the domain is taken.
    async fn create(&self, tenant: &Tenant) -> Result<Tenant, DomainError>;
    /// Removes the tenant together with its organizations and users.
    async fn delete(&self, id: &TenantId) -> Result<bool, DomainError>;
}
