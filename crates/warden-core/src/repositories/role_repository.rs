//! Role repository trait (port)
//!
//! Roles and permissions are shared reference data, not tenant-owned.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Role;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Role>, DomainError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DomainError>;
    async fn list(&self) -> Result<Vec<Role>, DomainError>;
}
