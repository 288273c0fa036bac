// ============================================================================
// Warden Core - Tenant Entity
// File: crates/warden-core/src/domain/tenant.rs
// ============================================================================

use std::any::Any;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use warden_shared::TenantId;

use super::entity::{Entity, EntityKind};
use crate::error::{DomainError, DomainResult};

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").expect("static label pattern")
});

/// Tenant entity, the isolation boundary.
///
/// `domain` holds the raw label until the domain normalization hook rewrites it
/// to `<label>.<root-domain>` right before the first insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub domain: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl Tenant {
    pub fn new(label: &str) -> DomainResult<Self> {
        let label = label.trim().to_lowercase();
        if !LABEL_RE.is_match(&label) {
            return Err(DomainError::Validation(format!(
                "Invalid tenant label: {}",
                label
            )));
        }

        Ok(Self {
            id: TenantId::new(),
            domain: label,
            is_active: true,
            created_at: Utc::now(),
            modified_at: None,
        })
    }

    /// The label part of a normalized domain.
    pub fn label<'a>(&'a self, root_domain: &str) -> Option<&'a str> {
        self.domain
            .strip_suffix(root_domain)
            .and_then(|rest| rest.strip_suffix('.'))
    }
}

impl Entity for Tenant {
    fn kind(&self) -> EntityKind {
        EntityKind::Tenant
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
