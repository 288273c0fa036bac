// ============================================================================
// Warden Core - Data-Access Session
// File: crates/warden-core/src/session.rs
// ============================================================================
//! Request-scoped access path to every repository.
//!
//! A [`DataSession`] is opened per request and carries the tenant filter once
//! [`crate::tenancy::install_tenant_filter`] has run. Every read and write of a
//! tenant-owned kind is issued with the session's [`QueryScope`], and every
//! insert goes through the before-persist hooks first.

use std::sync::Arc;

use tracing::{debug, error};
use uuid::Uuid;

use crate::domain::{Entity, EntityKind, Organization, Role, Tenant, TenantId, User};
use crate::error::{DomainError, DomainResult};
use crate::repositories::{
    InMemoryStore, OrganizationRepository, QueryScope, RoleRepository, TenantRepository, UserRepository,
};
use crate::tenancy::{HookRegistry, TenantFilter};

/// Shared repository bundle, built once at startup.
#[derive(Clone)]
pub struct Repositories {
    pub tenants: Arc<dyn TenantRepository>,
    pub users: Arc<dyn UserRepository>,
    pub organizations: Arc<dyn OrganizationRepository>,
    pub roles: Arc<dyn RoleRepository>,
}

impl Repositories {
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            tenants: store.clone(),
            users: store.clone(),
            organizations: store.clone(),
            roles: store,
        }
    }
}

#[derive(Clone)]
pub struct DataSession {
    repos: Repositories,
    hooks: Arc<HookRegistry>,
    filter: Option<TenantFilter>,
}

impl DataSession {
    /// Opens an unrestricted session. Never reuse one across requests.
    pub fn open(repos: Repositories, hooks: Arc<HookRegistry>) -> Self {
        Self {
            repos,
            hooks,
            filter: None,
        }
    }

    pub(crate) fn install_filter(&mut self, filter: TenantFilter) {
        self.filter = Some(filter);
    }

    pub fn tenant_filter(&self) -> Option<TenantFilter> {
        self.filter
    }

    /// `Tenant(id)` for tenant-owned kinds once a filter is installed.
    pub fn scope_for(&self, kind: EntityKind) -> QueryScope {
        match self.filter {
            Some(filter) if kind.is_tenant_owned() => QueryScope::Tenant(filter.tenant_id()),
            _ => QueryScope::Unrestricted,
        }
    }

    fn prepare_insert(&self, entity: &mut dyn Entity) -> DomainResult<()> {
        self.hooks.run_before_persist(&mut *entity)?;

        let kind = entity.kind();
        if !kind.is_tenant_owned() {
            return Ok(());
        }
        let owner = entity.tenant_id();
        if owner.is_none() || !self.scope_for(kind).admits(owner) {
            error!(target: "warden::tenancy", kind = %kind, "Tenant-owned insert outside the session scope");
            return Err(DomainError::MissingTenantContext);
        }
        Ok(())
    }

    /// Whether the filter lets this session see tenant `id` itself.
    fn admits_tenant(&self, id: &TenantId) -> bool {
        self.filter.is_none_or(|filter| filter.tenant_id() == *id)
    }

    // ------------------------------------------------------------------
    // Tenants
    // ------------------------------------------------------------------

    /// Runs the domain normalization hook exactly once, then persists.
    pub async fn insert_tenant(&self, mut tenant: Tenant) -> DomainResult<Tenant> {
        self.prepare_insert(&mut tenant)?;
        let created = self.repos.tenants.create(&tenant).await?;
        debug!(tenant_id = %created.id, domain = %created.domain, "Tenant persisted");
        Ok(created)
    }

    pub async fn find_tenant(&self, id: &TenantId) -> DomainResult<Option<Tenant>> {
        if !self.admits_tenant(id) {
            return Ok(None);
        }
        self.repos.tenants.find_by_id(id).await
    }

    pub async fn find_tenant_by_domain(&self, domain: &str) -> DomainResult<Option<Tenant>> {
        let tenant = self.repos.tenants.find_by_domain(domain).await?;
        Ok(tenant.filter(|t| self.admits_tenant(&t.id)))
    }

    pub async fn delete_tenant(&self, id: &TenantId) -> DomainResult<bool> {
        if !self.admits_tenant(id) {
            return Ok(false);
        }
        self.repos.tenants.delete(id).await
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    pub async fn insert_user(&self, mut user: User) -> DomainResult<User> {
        self.prepare_insert(&mut user)?;
        self.repos.users.create(&user).await
    }

    pub async fn find_user(&self, id: &Uuid) -> DomainResult<Option<User>> {
        self.repos.users.find_by_id(&self.scope_for(EntityKind::User), id).await
    }

    pub async fn find_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        self.repos
            .users
            .find_by_username(&self.scope_for(EntityKind::User), username)
            .await
    }

    pub async fn find_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        self.repos
            .users
            .find_by_email(&self.scope_for(EntityKind::User), email)
            .await
    }

    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.repos.users.list(&self.scope_for(EntityKind::User)).await
    }

    // ------------------------------------------------------------------
    // Organizations
    // ------------------------------------------------------------------

    pub async fn insert_organization(&self, mut organization: Organization) -> DomainResult<Organization> {
        self.prepare_insert(&mut organization)?;
        self.repos.organizations.create(&organization).await
    }

    pub async fn find_organization(&self, id: &Uuid) -> DomainResult<Option<Organization>> {
        self.repos
            .organizations
            .find_by_id(&self.scope_for(EntityKind::Organization), id)
            .await
    }

    pub async fn list_organizations(&self) -> DomainResult<Vec<Organization>> {
        self.repos
            .organizations
            .list(&self.scope_for(EntityKind::Organization))
            .await
    }

    pub async fn update_organization(&self, organization: &Organization) -> DomainResult<Option<Organization>> {
        self.repos
            .organizations
            .update(&self.scope_for(EntityKind::Organization), organization)
            .await
    }

    pub async fn delete_organization(&self, id: &Uuid) -> DomainResult<bool> {
        self.repos
            .organizations
            .delete(&self.scope_for(EntityKind::Organization), id)
            .await
    }

    // ------------------------------------------------------------------
    // Roles (shared reference data)
    // ------------------------------------------------------------------

    pub async fn find_role_by_name(&self, name: &str) -> DomainResult<Option<Role>> {
        self.repos.roles.find_by_name(name).await
    }

    pub async fn list_roles(&self) -> DomainResult<Vec<Role>> {
        self.repos.roles.list().await
    }
}
