// ============================================================================
// Warden Core - Organization Entity
// File: crates/warden-core/src/domain/organization.rs
// ============================================================================

use std::any::Any;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use warden_shared::TenantId;

use super::entity::{Entity, EntityKind};
use crate::error::DomainResult;

/// Organization entity, owned by exactly one tenant.
///
/// `tenant_id` is `None` only between construction and the first insert; the
/// stamping hook fills it from the request context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Organization {
    pub id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Organization name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: Option<String>,

    pub tenant_id: Option<TenantId>,

    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl Organization {
    pub fn new(name: String, description: Option<String>) -> DomainResult<Self> {
        let organization = Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            description: description.map(|d| d.trim().to_string()),
            tenant_id: None,
            created_at: Utc::now(),
            modified_at: None,
        };

        organization.validate()?;
        Ok(organization)
    }

    pub fn rename(&mut self, name: Option<String>, description: Option<String>) -> DomainResult<()> {
        if let Some(name) = name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = description {
            self.description = Some(description.trim().to_string());
        }
        self.modified_at = Some(Utc::now());
        self.validate()?;
        Ok(())
    }
}

impl Entity for Organization {
    fn kind(&self) -> EntityKind {
        EntityKind::Organization
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
