// ============================================================================
// Warden Core - Before-Persist Hook Registry
// File: crates/warden-core/src/tenancy/hooks.rs
// ============================================================================
//! Explicit registry mapping entity kinds to ordered before-persist callbacks.
//!
//! Built once at startup and shared read-only. The data session runs the hooks
//! of an entity's kind right before the entity's first insert.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::context;
use crate::domain::{Entity, EntityKind, Tenant};
use crate::error::{DomainError, DomainResult};

pub type BeforePersistHook = Arc<dyn Fn(&mut dyn Entity) -> DomainResult<()> + Send + Sync>;

#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<EntityKind, Vec<BeforePersistHook>>,
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<_, _> = self.hooks.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("HookRegistry").field("hooks", &counts).finish()
    }
}

impl HookRegistry {
    pub fn builder() -> HookRegistryBuilder {
        HookRegistryBuilder::default()
    }

    /// Tenant stamping for every tenant-owned kind except `User` (a user brings
    /// its own tenant at registration), plus domain normalization for `Tenant`.
    pub fn standard(root_domain: impl Into<String>) -> Self {
        let mut builder = Self::builder();
        for kind in EntityKind::ALL {
            if kind.is_tenant_owned() && kind != EntityKind::User {
                builder = builder.register(kind, tenant_stamping_hook());
            }
        }
        builder
            .register(EntityKind::Tenant, domain_normalization_hook(root_domain))
            .build()
    }

    pub fn hooks_for(&self, kind: EntityKind) -> &[BeforePersistHook] {
        self.hooks.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Runs the hooks of `entity`'s kind in registration order; stops at the first error.
    pub fn run_before_persist(&self, entity: &mut dyn Entity) -> DomainResult<()> {
        let kind = entity.kind();
        for hook in self.hooks_for(kind) {
            hook(&mut *entity)?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct HookRegistryBuilder {
    hooks: HashMap<EntityKind, Vec<BeforePersistHook>>,
}

impl HookRegistryBuilder {
    pub fn register(mut self, kind: EntityKind, hook: BeforePersistHook) -> Self {
        self.hooks.entry(kind).or_default().push(hook);
        self
    }

    pub fn build(self) -> HookRegistry {
        HookRegistry { hooks: self.hooks }
    }
}

/// Overwrites the entity's tenant with the one bound to the current request,
/// whatever the caller supplied.
pub fn tenant_stamping_hook() -> BeforePersistHook {
    Arc::new(|entity: &mut dyn Entity| {
        let tenant_id = context::require_tenant()?;
        if entity.tenant_id().is_some_and(|supplied| supplied != tenant_id) {
            debug!(kind = %entity.kind(), "Overwriting caller-supplied tenant");
        }
        entity.assign_tenant(tenant_id);
        debug!(kind = %entity.kind(), tenant_id = %tenant_id, "Tenant stamped");
        Ok(())
    })
}

/// Rewrites a tenant's raw label to `<label>.<root_domain>`.
///
/// Not idempotent: must run exactly once per tenant creation.
pub fn domain_normalization_hook(root_domain: impl Into<String>) -> BeforePersistHook {
    let root_domain: String = root_domain.into();
    Arc::new(move |entity: &mut dyn Entity| {
        let tenant = entity
            .as_any_mut()
            .downcast_mut::<Tenant>()
            .ok_or_else(|| DomainError::Internal("domain normalization on a non-tenant".to_string()))?;
        tenant.domain = format!("{}.{}", tenant.domain, root_domain);
        debug!(domain = %tenant.domain, "Tenant domain normalized");
        Ok(())
    })
}
