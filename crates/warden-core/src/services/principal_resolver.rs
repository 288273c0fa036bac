// ============================================================================
// Warden Core - Principal Resolver
// File: crates/warden-core/src/services/principal_resolver.rs
// ============================================================================
//! Bearer credential -> fully loaded [`Principal`].
//!
//! The only writer of the request context: on success the principal's tenant
//! is bound for the rest of the request.

use std::sync::Arc;

use tracing::{debug, error, warn};

use warden_security::JwtService;

use crate::domain::Principal;
use crate::error::{DomainError, DomainResult};
use crate::repositories::UserRepository;
use crate::tenancy::context;

pub struct PrincipalResolver {
    jwt: Arc<JwtService>,
    users: Arc<dyn UserRepository>,
}

impl PrincipalResolver {
    pub fn new(jwt: Arc<JwtService>, users: Arc<dyn UserRepository>) -> Self {
        Self { jwt, users }
    }

    /// Every failure, including a failed lookup, is `Unauthenticated`.
    pub async fn resolve(&self, bearer: Option<&str>) -> DomainResult<Principal> {
        let token = bearer
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DomainError::Unauthenticated("missing bearer credential".to_string()))?;

        let claims = self.jwt.validate_access_token(token).map_err(|e| {
            warn!("Credential rejected: {}", e);
            DomainError::Unauthenticated(e.to_string())
        })?;
        let user_id = claims
            .user_id()
            .map_err(|e| DomainError::Unauthenticated(e.to_string()))?;

        let principal = match self.users.find_principal(&user_id).await {
            Ok(Some(principal)) => principal,
            Ok(None) => {
                warn!(user_id = %user_id, "Credential references a missing user");
                return Err(DomainError::Unauthenticated("user no longer exists".to_string()));
            }
            Err(e) => {
                error!(user_id = %user_id, "Principal lookup failed: {}", e);
                return Err(DomainError::Unauthenticated("principal lookup failed".to_string()));
            }
        };

        if let Some(tenant_id) = principal.tenant_id {
            context::set_tenant(tenant_id)?;
        }
        debug!(user_id = %principal.user_id, role = %principal.role.name, "Principal resolved");
        Ok(principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, TenantId};
    use crate::repositories::MockUserRepository;
    use uuid::Uuid;

    fn jwt() -> Arc<JwtService> {
        Arc::new(JwtService::new("resolver-secret", 900, 3600))
    }

    fn principal(user_id: Uuid, tenant_id: TenantId) -> Principal {
        Principal {
            user_id,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::new("member", vec![]),
            tenant_id: Some(tenant_id),
        }
    }

    fn is_unauthenticated(result: &DomainResult<Principal>) -> bool {
        matches!(result, Err(DomainError::Unauthenticated(_)))
    }

    #[tokio::test]
    async fn test_resolves_and_binds_tenant() {
        let jwt = jwt();
        let user_id = Uuid::new_v4();
        let tenant_id = TenantId::new();
        let token = jwt.generate_access_token(&user_id).unwrap();

        let mut users = MockUserRepository::new();
        users
            .expect_find_principal()
            .times(1)
            .returning(move |id| Ok(Some(principal(*id, tenant_id))));
        let resolver = PrincipalResolver::new(jwt, Arc::new(users));

        let (resolved, bound) = context::scope(async {
            let resolved = resolver.resolve(Some(&token)).await.unwrap();
            tokio::task::yield_now().await;
            (resolved, context::current_tenant())
        })
        .await;
        assert_eq!(resolved.user_id, user_id);
        assert_eq!(bound, Some(tenant_id));
    }

    #[tokio::test]
    async fn test_missing_or_malformed_credential() {
        let resolver = PrincipalResolver::new(jwt(), Arc::new(MockUserRepository::new()));
        context::scope(async {
            assert!(is_unauthenticated(&resolver.resolve(None).await));
            assert!(is_unauthenticated(&resolver.resolve(Some("")).await));
            assert!(is_unauthenticated(&resolver.resolve(Some("not.a.jwt")).await));
            assert_eq!(context::current_tenant(), None);
        })
        .await;
    }

    #[tokio::test]
    async fn test_forged_and_refresh_tokens_rejected() {
        let user_id = Uuid::new_v4();
        let forged = JwtService::new("other-secret", 900, 3600)
            .generate_access_token(&user_id)
            .unwrap();
        let jwt = jwt();
        let refresh = jwt.generate_refresh_token(&user_id).unwrap();
        let resolver = PrincipalResolver::new(jwt, Arc::new(MockUserRepository::new()));

        context::scope(async {
            assert!(is_unauthenticated(&resolver.resolve(Some(&forged)).await));
            assert!(is_unauthenticated(&resolver.resolve(Some(&refresh)).await));
        })
        .await;
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let jwt = Arc::new(JwtService::new("resolver-secret", -120, 3600));
        let token = jwt.generate_access_token(&Uuid::new_v4()).unwrap();
        let resolver = PrincipalResolver::new(jwt, Arc::new(MockUserRepository::new()));
        let result = context::scope(async { resolver.resolve(Some(&token)).await }).await;
        assert!(is_unauthenticated(&result));
    }

    #[tokio::test]
    async fn test_deleted_user_and_lookup_failure() {
        let jwt = jwt();
        let token = jwt.generate_access_token(&Uuid::new_v4()).unwrap();

        let mut gone = MockUserRepository::new();
        gone.expect_find_principal().returning(|_| Ok(None));
        let resolver = PrincipalResolver::new(jwt.clone(), Arc::new(gone));
        let result = context::scope(async { resolver.resolve(Some(&token)).await }).await;
        assert!(is_unauthenticated(&result));

        let mut failing = MockUserRepository::new();
        failing
            .expect_find_principal()
            .returning(|_| Err(DomainError::Database("connection reset".to_string())));
        let resolver = PrincipalResolver::new(jwt, Arc::new(failing));
        let result = context::scope(async { resolver.resolve(Some(&token)).await }).await;
        assert!(is_unauthenticated(&result));
    }
}
