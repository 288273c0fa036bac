// ============================================================================
// Warden Core - Authentication Service
// File: crates/warden-core/src/services/auth_service.rs
// ============================================================================
//! Registration (tenant bootstrap), login and token refresh.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use warden_security::{JwtService, PasswordService};
use warden_shared::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use warden_shared::utils::mask_email;

use crate::domain::{Tenant, User};
use crate::error::{DomainError, DomainResult};
use crate::session::DataSession;

pub struct AuthService {
    jwt: Arc<JwtService>,
    default_role: String,
}

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Raw tenant label, e.g. `acme`.
    pub tenant: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
}

#[derive(Debug, Clone)]
pub struct RegisterResult {
    pub tenant: Tenant,
    pub user: User,
    pub tokens: AuthTokens,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: User,
    pub tokens: AuthTokens,
}

fn invalid_credentials() -> DomainError {
    DomainError::Unauthenticated("invalid credentials".to_string())
}

impl AuthService {
    pub fn new(jwt: Arc<JwtService>, default_role: impl Into<String>) -> Self {
        Self {
            jwt,
            default_role: default_role.into(),
        }
    }

    /// Creates a tenant together with its first user. The only path that
    /// persists a user without a tenant filter in place.
    pub async fn register(&self, session: &DataSession, input: RegisterInput) -> DomainResult<RegisterResult> {
        info!("Registration attempt for tenant label: {}", input.tenant);

        let tenant = Tenant::new(&input.tenant)?;
        let password_len = input.password.chars().count();
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&password_len) {
            return Err(DomainError::Validation(format!(
                "Password must be between {} and {} characters",
                MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
            )));
        }

        if session.find_user_by_username(input.username.trim()).await?.is_some() {
            warn!("Registration failed: username taken: {}", input.username);
            return Err(DomainError::duplicate("user.username", input.username.trim()));
        }
        let email = input.email.trim().to_lowercase();
        if session.find_user_by_email(&email).await?.is_some() {
            warn!("Registration failed: email taken: {}", mask_email(&email));
            return Err(DomainError::duplicate("user.email", email));
        }

        let role = session.find_role_by_name(&self.default_role).await?.ok_or_else(|| {
            error!(role = %self.default_role, "Default registration role is not seeded");
            DomainError::Internal(format!("role {} not found", self.default_role))
        })?;

        let password_hash =
            PasswordService::hash(&input.password).map_err(|e| DomainError::Internal(e.to_string()))?;

        let tenant = session.insert_tenant(tenant).await?;
        let user = match User::new(input.username, email, password_hash, role.id, tenant.id) {
            Ok(user) => session.insert_user(user).await,
            Err(e) => Err(e),
        };
        let user = match user {
            Ok(user) => user,
            Err(e) => {
                // Undo the bootstrap so the domain can be claimed again
                if let Err(cleanup) = session.delete_tenant(&tenant.id).await {
                    error!(tenant_id = %tenant.id, "Failed to remove orphaned tenant: {}", cleanup);
                }
                return Err(e);
            }
        };

        let tokens = self.issue_tokens(&user.id)?;
        info!(tenant_id = %tenant.id, domain = %tenant.domain, user_id = %user.id, "Tenant registered");
        Ok(RegisterResult { tenant, user, tokens })
    }

    /// `login` is a username or an email address.
    pub async fn login(&self, session: &DataSession, login: &str, password: &str) -> DomainResult<LoginResult> {
        let login = login.trim();
        let user = if login.contains('@') {
            session.find_user_by_email(&login.to_lowercase()).await?
        } else {
            session.find_user_by_username(login).await?
        };
        let user = user.ok_or_else(|| {
            warn!("Login failed: unknown account");
            invalid_credentials()
        })?;

        let valid = PasswordService::verify(password, &user.password_hash).map_err(|e| {
            error!(user_id = %user.id, "Stored password hash unreadable: {}", e);
            invalid_credentials()
        })?;
        if !valid {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(invalid_credentials());
        }
        self.ensure_active(session, &user).await?;

        let tokens = self.issue_tokens(&user.id)?;
        info!(user_id = %user.id, "Login successful");
        Ok(LoginResult { user, tokens })
    }

    pub async fn refresh(&self, session: &DataSession, refresh_token: &str) -> DomainResult<AuthTokens> {
        let claims = self.jwt.validate_refresh_token(refresh_token).map_err(|e| {
            warn!("Refresh rejected: {}", e);
            DomainError::Unauthenticated(e.to_string())
        })?;
        let user_id = claims
            .user_id()
            .map_err(|e| DomainError::Unauthenticated(e.to_string()))?;

        let user = session
            .find_user(&user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthenticated("user no longer exists".to_string()))?;
        self.ensure_active(session, &user).await?;

        self.issue_tokens(&user.id)
    }

    async fn ensure_active(&self, session: &DataSession, user: &User) -> DomainResult<()> {
        if !user.is_active {
            warn!(user_id = %user.id, "Inactive user rejected");
            return Err(invalid_credentials());
        }
        let tenant = match user.tenant_id {
            Some(tenant_id) => session.find_tenant(&tenant_id).await?,
            None => None,
        };
        match tenant {
            Some(tenant) if tenant.is_active => Ok(()),
            _ => {
                warn!(user_id = %user.id, "User of an inactive or missing tenant rejected");
                Err(invalid_credentials())
            }
        }
    }

    fn issue_tokens(&self, user_id: &Uuid) -> DomainResult<AuthTokens> {
        let access_token = self
            .jwt
            .generate_access_token(user_id)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let refresh_token = self
            .jwt
            .generate_refresh_token(user_id)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer",
        })
    }
}
