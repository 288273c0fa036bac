//! User domain entity

use std::any::Any;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use warden_shared::TenantId;

use super::entity::{Entity, EntityKind};
use crate::error::DomainResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: Uuid,

    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role_id: Uuid,
    pub tenant_id: Option<TenantId>,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl User {
    /// Users bring their own tenant: they are created either together with a
    /// fresh tenant at registration or by a caller that already knows it.
    pub fn new(
        username: String,
        email: String,
        password_hash: String,
        role_id: Uuid,
        tenant_id: TenantId,
    ) -> DomainResult<Self> {
        let user = Self {
            id: Uuid::new_v4(),
            username: username.trim().to_string(),
            email: email.trim().to_lowercase(),
            password_hash,
            role_id,
            tenant_id: Some(tenant_id),
            is_active: true,
            created_at: Utc::now(),
            modified_at: None,
        };

        user.validate()?;
        Ok(user)
    }
}

impl Entity for User {
    fn kind(&self) -> EntityKind {
        EntityKind::User
    }

    fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    fn assign_tenant(&mut self, tenant_id: TenantId) {
        self.tenant_id = Some(tenant_id);
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
