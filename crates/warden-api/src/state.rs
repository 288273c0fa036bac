use std::sync::Arc;

use warden_core::services::{AuthService, PrincipalResolver};
use warden_core::tenancy::HookRegistry;
use warden_core::{DataSession, Repositories};
use warden_security::JwtService;
use warden_shared::config::TenancySettings;

/// Shared, read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub hooks: Arc<HookRegistry>,
    pub resolver: Arc<PrincipalResolver>,
    pub auth: Arc<AuthService>,
    pub tenancy: Arc<TenancySettings>,
}

impl AppState {
    /// Builds the hook registry once from `tenancy.root_domain`.
    pub fn new(repos: Repositories, jwt: JwtService, tenancy: TenancySettings) -> Self {
        let jwt = Arc::new(jwt);
        Self {
            hooks: Arc::new(HookRegistry::standard(tenancy.root_domain.clone())),
            resolver: Arc::new(PrincipalResolver::new(jwt.clone(), repos.users.clone())),
            auth: Arc::new(AuthService::new(jwt, tenancy.default_role.clone())),
            tenancy: Arc::new(tenancy),
            repos,
        }
    }

    /// A fresh, unrestricted session for one request.
    pub fn open_session(&self) -> DataSession {
        DataSession::open(self.repos.clone(), self.hooks.clone())
    }
}
