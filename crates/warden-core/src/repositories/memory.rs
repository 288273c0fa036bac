// ============================================================================
// Warden Core - In-Memory Repository Adapter
// File: crates/warden-core/src/repositories/memory.rs
// ============================================================================
//! Process-local implementation of every repository port.
//!
//! Enforces the same uniqueness, cascade and scope semantics as the PostgreSQL
//! adapters. Used by tests and by local runs without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{OrganizationRepository, QueryScope, RoleRepository, TenantRepository, UserRepository};
use crate::domain::{Organization, Principal, Role, Tenant, TenantId, User};
use crate::error::DomainError;

#[derive(Default)]
struct MemoryState {
    tenants: HashMap<TenantId, Tenant>,
    users: HashMap<Uuid, User>,
    organizations: HashMap<Uuid, Organization>,
    roles: HashMap<Uuid, Role>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds role reference data. Role names are unique.
    pub async fn insert_role(&self, role: Role) -> Result<Role, DomainError> {
        let mut state = self.state.write().await;
        if state.roles.values().any(|r| r.name == role.name) {
            return Err(DomainError::duplicate("role.name", role.name));
        }
        for permission in &role.permissions {
            let taken = state
                .roles
                .values()
                .flat_map(|r| r.permissions.iter())
                .any(|p| p.name == permission.name && p.id != permission.id);
            if taken {
                return Err(DomainError::duplicate("permission.name", permission.name.clone()));
            }
        }
        state.roles.insert(role.id, role.clone());
        Ok(role)
    }

    /// Returns whether the tenant existed.
    pub async fn set_tenant_active(&self, id: &TenantId, is_active: bool) -> bool {
        let mut state = self.state.write().await;
        match state.tenants.get_mut(id) {
            Some(tenant) => {
                tenant.is_active = is_active;
                tenant.modified_at = Some(chrono::Utc::now());
                true
            }
            None => false,
        }
    }

    pub async fn tenant_count(&self) -> usize {
        self.state.read().await.tenants.len()
    }

    pub async fn organization_count(&self) -> usize {
        self.state.read().await.organizations.len()
    }
}

#[async_trait]
impl TenantRepository for InMemoryStore {
    async fn find_by_id(&self, id: &TenantId) -> Result<Option<Tenant>, DomainError> {
        Ok(self.state.read().await.tenants.get(id).cloned())
    }

    async fn find_by_domain(&self, domain: &str) -> Result<Option<Tenant>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .tenants
            .values()
            .find(|t| t.domain.eq_ignore_ascii_case(domain))
            .cloned())
    }

    async fn create(&self, tenant: &Tenant) -> Result<Tenant, DomainError> {
        let mut state = self.state.write().await;
        if state
            .tenants
            .values()
            .any(|t| t.domain.eq_ignore_ascii_case(&tenant.domain))
        {
            return Err(DomainError::duplicate("tenant.domain", tenant.domain.clone()));
        }
        state.tenants.insert(tenant.id, tenant.clone());
        Ok(tenant.clone())
    }

    async fn delete(&self, id: &TenantId) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        if state.tenants.remove(id).is_none() {
            return Ok(false);
        }
        state.organizations.retain(|_, o| o.tenant_id != Some(*id));
        state.users.retain(|_, u| u.tenant_id != Some(*id));
        Ok(true)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, scope: &QueryScope, id: &Uuid) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .get(id)
            .filter(|u| scope.admits(u.tenant_id))
            .cloned())
    }

    async fn find_by_username(&self, scope: &QueryScope, username: &str) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username == username && scope.admits(u.tenant_id))
            .cloned())
    }

    async fn find_by_email(&self, scope: &QueryScope, email: &str) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email) && scope.admits(u.tenant_id))
            .cloned())
    }

    async fn list(&self, scope: &QueryScope) -> Result<Vec<User>, DomainError> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|u| scope.admits(u.tenant_id))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    async fn create(&self, user: &User) -> Result<User, DomainError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(DomainError::duplicate("user.username", user.username.clone()));
        }
        if state
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(DomainError::duplicate("user.email", user.email.clone()));
        }
        match user.tenant_id {
            Some(tenant_id) if state.tenants.contains_key(&tenant_id) => {}
            _ => return Err(DomainError::Database("user.tenant_id violates foreign key".to_string())),
        }
        if !state.roles.contains_key(&user.role_id) {
            return Err(DomainError::Database("user.role_id violates foreign key".to_string()));
        }
        state.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_principal(&self, id: &Uuid) -> Result<Option<Principal>, DomainError> {
        let state = self.state.read().await;
        let Some(user) = state.users.get(id) else {
            return Ok(None);
        };
        let role = state
            .roles
            .get(&user.role_id)
            .cloned()
            .ok_or_else(|| DomainError::Database(format!("role {} missing", user.role_id)))?;

        Ok(Some(Principal {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role,
            tenant_id: user.tenant_id,
        }))
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryStore {
    async fn find_by_id(&self, scope: &QueryScope, id: &Uuid) -> Result<Option<Organization>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .organizations
            .get(id)
            .filter(|o| scope.admits(o.tenant_id))
            .cloned())
    }

    async fn list(&self, scope: &QueryScope) -> Result<Vec<Organization>, DomainError> {
        let state = self.state.read().await;
        let mut organizations: Vec<Organization> = state
            .organizations
            .values()
            .filter(|o| scope.admits(o.tenant_id))
            .cloned()
            .collect();
        organizations.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(organizations)
    }

    async fn create(&self, organization: &Organization) -> Result<Organization, DomainError> {
        let mut state = self.state.write().await;
        match organization.tenant_id {
            Some(tenant_id) if state.tenants.contains_key(&tenant_id) => {}
            _ => {
                return Err(DomainError::Database(
                    "organization.tenant_id violates foreign key".to_string(),
                ))
            }
        }
        state.organizations.insert(organization.id, organization.clone());
        Ok(organization.clone())
    }

    async fn update(&self, scope: &QueryScope, organization: &Organization) -> Result<Option<Organization>, DomainError> {
        let mut state = self.state.write().await;
        match state.organizations.get_mut(&organization.id) {
            Some(existing) if scope.admits(existing.tenant_id) => {
                // tenant_id is never rewritten by an update
                existing.name = organization.name.clone();
                existing.description = organization.description.clone();
                existing.modified_at = organization.modified_at;
                Ok(Some(existing.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, scope: &QueryScope, id: &Uuid) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        let visible = state
            .organizations
            .get(id)
            .is_some_and(|o| scope.admits(o.tenant_id));
        if visible {
            state.organizations.remove(id);
        }
        Ok(visible)
    }
}

#[async_trait]
impl RoleRepository for InMemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Role>, DomainError> {
        Ok(self.state.read().await.roles.get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DomainError> {
        let state = self.state.read().await;
        Ok(state.roles.values().find(|r| r.name == name).cloned())
    }

    async fn list(&self) -> Result<Vec<Role>, DomainError> {
        let state = self.state.read().await;
        let mut roles: Vec<Role> = state.roles.values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (InMemoryStore, Tenant, Tenant, Role) {
        let store = InMemoryStore::new();
        let role = store.insert_role(Role::new("member", vec![])).await.unwrap();
        let t1 = TenantRepository::create(&store, &Tenant::new("one").unwrap()).await.unwrap();
        let t2 = TenantRepository::create(&store, &Tenant::new("two").unwrap()).await.unwrap();
        (store, t1, t2, role)
    }

    fn org_in(tenant: &Tenant, name: &str) -> Organization {
        let mut org = Organization::new(name.to_string(), None).unwrap();
        org.tenant_id = Some(tenant.id);
        org
    }

    #[tokio::test]
    async fn test_scope_hides_other_tenants_rows() {
        let (store, t1, t2, _) = seeded().await;
        let foreign = OrganizationRepository::create(&store, &org_in(&t2, "foreign")).await.unwrap();
        OrganizationRepository::create(&store, &org_in(&t1, "local")).await.unwrap();

        let scope = QueryScope::Tenant(t1.id);
        assert!(OrganizationRepository::find_by_id(&store, &scope, &foreign.id).await.unwrap().is_none());
        let listed = OrganizationRepository::list(&store, &scope).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "local");

        assert!(!OrganizationRepository::delete(&store, &scope, &foreign.id).await.unwrap());
        assert_eq!(store.organization_count().await, 2);
    }

    #[tokio::test]
    async fn test_duplicate_domain() {
        let (store, _, _, _) = seeded().await;
        let err = TenantRepository::create(&store, &Tenant::new("one").unwrap()).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateConstraint { .. }));
    }

    #[tokio::test]
    async fn test_delete_tenant_cascades() {
        let (store, t1, t2, role) = seeded().await;
        OrganizationRepository::create(&store, &org_in(&t1, "a")).await.unwrap();
        OrganizationRepository::create(&store, &org_in(&t2, "b")).await.unwrap();
        let user = User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
            role.id,
            t1.id,
        )
        .unwrap();
        UserRepository::create(&store, &user).await.unwrap();

        assert!(TenantRepository::delete(&store, &t1.id).await.unwrap());
        assert_eq!(store.organization_count().await, 1);
        assert!(UserRepository::find_by_id(&store, &QueryScope::Unrestricted, &user.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email() {
        let (store, t1, _, role) = seeded().await;
        let make = |username: &str, email: &str| {
            User::new(username.to_string(), email.to_string(), "h".to_string(), role.id, t1.id).unwrap()
        };
        UserRepository::create(&store, &make("alice", "alice@example.com")).await.unwrap();

        let err = UserRepository::create(&store, &make("alice", "other@example.com")).await.unwrap_err();
        assert_eq!(err, DomainError::duplicate("user.username", "alice"));

        let err = UserRepository::create(&store, &make("bob", "ALICE@example.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateConstraint { field, .. } if field == "user.email"));
    }
}
