//! User repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use super::scope::QueryScope;
use crate::domain::{Principal, User};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, scope: &QueryScope, id: &Uuid) -> Result<Option<User>, DomainError>;
    async fn find_by_username(&self, scope: &QueryScope, username: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_email(&self, scope: &QueryScope, email: &str) -> Result<Option<User>, DomainError>;
    async fn list(&self, scope: &QueryScope) -> Result<Vec<User>, DomainError>;
    /// Fails with `DuplicateConstraint` on username or email.
    async fn create(&self, user: &User) -> Result<User, DomainError>;
    /// Loads user, role, the role's permissions and tenant in one round trip.
    async fn find_principal(&self, id: &Uuid) -> Result<Option<Principal>, DomainError>;
}
