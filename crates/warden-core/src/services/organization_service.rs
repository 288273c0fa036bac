// ============================================================================
// Warden Core - Organization Service
// File: crates/warden-core/src/services/organization_service.rs
// ============================================================================
//! Organization CRUD over a scoped [`DataSession`].
//!
//! The owning tenant always comes from the request context through the
//! stamping hook; nothing here accepts one from the caller. Records of other
//! tenants surface as `NotFound`.

use tracing::info;
use uuid::Uuid;

use crate::domain::Organization;
use crate::error::{DomainError, DomainResult};
use crate::session::DataSession;

pub struct OrganizationService<'a> {
    session: &'a DataSession,
}

fn not_found() -> DomainError {
    DomainError::NotFound("Organization".to_string())
}

impl<'a> OrganizationService<'a> {
    pub fn new(session: &'a DataSession) -> Self {
        Self { session }
    }

    pub async fn create(&self, name: String, description: Option<String>) -> DomainResult<Organization> {
        let organization = Organization::new(name, description)?;
        let created = self.session.insert_organization(organization).await?;
        info!(organization_id = %created.id, "Organization created");
        Ok(created)
    }

    pub async fn get(&self, id: &Uuid) -> DomainResult<Organization> {
        self.session.find_organization(id).await?.ok_or_else(not_found)
    }

    pub async fn list(&self) -> DomainResult<Vec<Organization>> {
        self.session.list_organizations().await
    }

    pub async fn update(
        &self,
        id: &Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> DomainResult<Organization> {
        let mut organization = self.get(id).await?;
        organization.rename(name, description)?;
        self.session
            .update_organization(&organization)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn delete(&self, id: &Uuid) -> DomainResult<()> {
        if self.session.delete_organization(id).await? {
            info!(organization_id = %id, "Organization deleted");
            Ok(())
        } else {
            Err(not_found())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Principal, Role, Tenant};
    use crate::repositories::InMemoryStore;
    use crate::session::Repositories;
    use crate::tenancy::{context, install_tenant_filter, HookRegistry, RouteAccess};
    use std::sync::Arc;

    async fn scoped(repos: &Repositories, hooks: &Arc<HookRegistry>, tenant: &Tenant) -> DataSession {
        context::set_tenant(tenant.id).unwrap();
        let principal = Principal {
            user_id: Uuid::new_v4(),
            username: "owner".to_string(),
            email: "owner@example.com".to_string(),
            role: Role::new("member", vec![]),
            tenant_id: Some(tenant.id),
        };
        let mut session = DataSession::open(repos.clone(), hooks.clone());
        install_tenant_filter(&mut session, RouteAccess::Authenticated, Some(&principal)).unwrap();
        session
    }

    #[tokio::test]
    async fn test_foreign_organization_is_not_found() {
        let repos = Repositories::in_memory(Arc::new(InMemoryStore::new()));
        let hooks = Arc::new(HookRegistry::standard("example.com"));
        let bootstrap = DataSession::open(repos.clone(), hooks.clone());
        let t1 = bootstrap.insert_tenant(Tenant::new("one").unwrap()).await.unwrap();
        let t2 = bootstrap.insert_tenant(Tenant::new("two").unwrap()).await.unwrap();

        let foreign = context::scope(async {
            let session = scoped(&repos, &hooks, &t2).await;
            OrganizationService::new(&session)
                .create("Foreign".to_string(), None)
                .await
                .unwrap()
        })
        .await;
        assert_eq!(foreign.tenant_id, Some(t2.id));

        context::scope(async {
            let session = scoped(&repos, &hooks, &t1).await;
            let service = OrganizationService::new(&session);
            let not_found = DomainError::NotFound("Organization".to_string());
            assert_eq!(service.get(&foreign.id).await, Err(not_found.clone()));
            assert_eq!(
                service.update(&foreign.id, Some("Mine".to_string()), None).await,
                Err(not_found.clone())
            );
            assert_eq!(service.delete(&foreign.id).await, Err(not_found));

            let own = service.create("Own".to_string(), None).await.unwrap();
            let renamed = service.update(&own.id, Some("Renamed".to_string()), None).await.unwrap();
            assert_eq!(renamed.name, "Renamed");
            assert_eq!(renamed.tenant_id, Some(t1.id));
        })
        .await;
    }
}
