//! User and tenant lookups for the authenticated caller.

use uuid::Uuid;

use crate::domain::{Principal, Role, Tenant, User};
use crate::error::{DomainError, DomainResult};
use crate::session::DataSession;

pub struct UserService<'a> {
    session: &'a DataSession,
}

impl<'a> UserService<'a> {
    pub fn new(session: &'a DataSession) -> Self {
        Self { session }
    }

    pub async fn get(&self, id: &Uuid) -> DomainResult<User> {
        self.session
            .find_user(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User".to_string()))
    }

    pub async fn list(&self) -> DomainResult<Vec<User>> {
        self.session.list_users().await
    }

    /// The caller's own tenant.
    pub async fn tenant_of(&self, principal: &Principal) -> DomainResult<Tenant> {
        let tenant_id = principal.tenant_id.ok_or(DomainError::MissingTenantContext)?;
        self.session
            .find_tenant(&tenant_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Tenant".to_string()))
    }

    pub async fn roles(&self) -> DomainResult<Vec<Role>> {
        self.session.list_roles().await
    }
}
