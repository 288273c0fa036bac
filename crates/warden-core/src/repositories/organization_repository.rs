//! Organization repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use super::scope::QueryScope;
use crate::domain::Organization;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn find_by_id(&self, scope: &QueryScope, id: &Uuid) -> Result<Option<Organization>, DomainError>;
    async fn list(&self, scope: &QueryScope) -> Result<Vec<Organization>, DomainError>;
    async fn create(&self, organization: &Organization) -> Result<Organization, DomainError>;
    /// `None` when no row matched under `scope`.
    async fn update(&self, scope: &QueryScope, organization: &Organization) -> Result<Option<Organization>, DomainError>;
    async fn delete(&self, scope: &QueryScope, id: &Uuid) -> Result<bool, DomainError>;
}
