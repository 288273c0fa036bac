//! Request and response DTOs

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use warden_core::authorization::{Action, Subject};
use warden_core::domain::{Organization, Principal, Role, Tenant, TenantId, User};
use warden_core::services::AuthTokens;

static TENANT_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").expect("static label pattern")
});

// ----------------------------------------------------------------------------
// Requests
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,

    /// Raw label; the server appends the root domain.
    #[validate(regex(path = *TENANT_LABEL, message = "Invalid tenant label"))]
    pub tenant: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username or email.
    #[validate(length(min = 1, message = "Login is required"))]
    pub login: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 255, message = "Organization name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Accepted for compatibility and ignored: the owner is always the caller's tenant.
    #[serde(default)]
    pub tenant_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrganizationRequest {
    #[validate(length(min = 1, max = 255, message = "Organization name must be between 1 and 255 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

// ----------------------------------------------------------------------------
// Responses
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role_id: Uuid,
    pub tenant_id: Option<TenantId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role_id: user.role_id,
            tenant_id: user.tenant_id,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TenantResponse {
    pub id: TenantId,
    pub domain: String,
    pub label: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TenantResponse {
    pub fn new(tenant: Tenant, root_domain: &str) -> Self {
        Self {
            label: tenant.label(root_domain).map(str::to_string),
            id: tenant.id,
            domain: tenant.domain,
            is_active: tenant.is_active,
            created_at: tenant.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrganizationResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub tenant_id: Option<TenantId>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<Organization> for OrganizationResponse {
    fn from(org: Organization) -> Self {
        Self {
            id: org.id,
            name: org.name,
            description: org.description,
            tenant_id: org.tenant_id,
            created_at: org.created_at,
            modified_at: org.modified_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GrantResponse {
    pub action: Action,
    pub subject: Subject,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoleResponse {
    pub id: Uuid,
    pub name: String,
    pub permissions: Vec<GrantResponse>,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
            permissions: role
                .permissions
                .into_iter()
                .map(|p| GrantResponse {
                    action: p.action,
                    subject: p.subject,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub tenant_id: Option<TenantId>,
}

impl From<Principal> for MeResponse {
    fn from(principal: Principal) -> Self {
        Self {
            id: principal.user_id,
            username: principal.username,
            email: principal.email,
            role: principal.role.name,
            tenant_id: principal.tenant_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<TenantResponse>,
    #[serde(flatten)]
    pub tokens: AuthTokens,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(tenant: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: password.to_string(),
            tenant: tenant.to_string(),
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register("acme", "long enough").validate().is_ok());
        assert!(register("Acme", "long enough").validate().is_err());
        assert!(register("acme.example.com", "long enough").validate().is_err());
        assert!(register("acme", "short").validate().is_err());
    }

    #[test]
    fn test_user_response_has_no_secret() {
        let user = User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "$argon2id$v=19$secret".to_string(),
            Uuid::new_v4(),
            TenantId::new(),
        )
        .unwrap();
        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
    }
}
