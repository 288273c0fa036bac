//! Entity kinds and the object-safe view the persistence hooks work on.

use std::any::Any;
use std::fmt;

use warden_shared::TenantId;

/// Closed set of persisted entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Tenant,
    User,
    Organization,
    Role,
    Permission,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Tenant,
        EntityKind::User,
        EntityKind::Organization,
        EntityKind::Role,
        EntityKind::Permission,
    ];

    /// Tenant-owned kinds carry a tenant reference and are subject to the scope filter.
    pub fn is_tenant_owned(&self) -> bool {
        matches!(self, EntityKind::User | EntityKind::Organization)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Tenant => "tenant",
            EntityKind::User => "user",
            EntityKind::Organization => "organization",
            EntityKind::Role => "role",
            EntityKind::Permission => "permission",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persistable record as seen by before-persist hooks.
pub trait Entity: Any + Send + Sync {
    fn kind(&self) -> EntityKind;

    fn tenant_id(&self) -> Option<TenantId> {
        None
    }

    /// Overwrites the tenant reference. No-op for kinds that are not tenant-owned.
    fn assign_tenant(&mut self, _tenant_id: TenantId) {}

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_owned_kinds() {
        let owned: Vec<_> = EntityKind::ALL
            .iter()
            .filter(|k| k.is_tenant_owned())
            .copied()
            .collect();
        assert_eq!(owned, vec![EntityKind::User, EntityKind::Organization]);
    }
}
