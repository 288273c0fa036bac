//! Ability: the in-memory capability set of a principal.

use std::collections::HashSet;

use tracing::debug;

use super::capability::{Action, Subject};
use crate::domain::{Principal, Role};

/// Union of (action, subject) grants. Grants are additive; nothing revokes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ability {
    grants: HashSet<(Action, Subject)>,
}

impl Ability {
    pub fn grant(&mut self, action: Action, subject: Subject) {
        self.grants.insert((action, subject));
    }

    /// A grant matches when its subject equals `subject` and its action equals
    /// `action` or is the `Manage` wildcard.
    pub fn can(&self, action: Action, subject: Subject) -> bool {
        self.grants.contains(&(action, subject)) || self.grants.contains(&(Action::Manage, subject))
    }

    pub fn cannot(&self, action: Action, subject: Subject) -> bool {
        !self.can(action, subject)
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

pub struct AbilityFactory;

impl AbilityFactory {
    /// Each permission of the role contributes exactly one grant.
    pub fn for_role(role: &Role) -> Ability {
        let mut ability = Ability::default();
        for permission in &role.permissions {
            ability.grant(permission.action, permission.subject);
        }
        debug!(role = %role.name, grants = ability.len(), "Ability built");
        ability
    }

    pub fn for_principal(principal: &Principal) -> Ability {
        Self::for_role(&principal.role)
    }
}
