//! The authenticated caller of a request

use serde::Serialize;
use uuid::Uuid;

use warden_shared::TenantId;

use super::role::Role;

/// Identity, role (with its permissions) and tenant of the caller, loaded once
/// per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub tenant_id: Option<TenantId>,
}
