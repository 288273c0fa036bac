//! Closed vocabularies for grants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// What a grant allows. `Manage` is the wildcard and matches every action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Manage,
    Create,
    ReadAny,
    ReadOwn,
    UpdateAny,
    UpdateOwn,
    DeleteAny,
    DeleteOwn,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Manage => "manage",
            Action::Create => "create",
            Action::ReadAny => "read-any",
            Action::ReadOwn => "read-own",
            Action::UpdateAny => "update-any",
            Action::UpdateOwn => "update-own",
            Action::DeleteAny => "delete-any",
            Action::DeleteOwn => "delete-own",
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Action::Manage)
    }
}

impl FromStr for Action {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manage" => Ok(Action::Manage),
            "create" => Ok(Action::Create),
            "read-any" => Ok(Action::ReadAny),
            "read-own" => Ok(Action::ReadOwn),
            "update-any" => Ok(Action::UpdateAny),
            "update-own" => Ok(Action::UpdateOwn),
            "delete-any" => Ok(Action::DeleteAny),
            "delete-own" => Ok(Action::DeleteOwn),
            other => Err(DomainError::Validation(format!("Unknown action: {}", other))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resource type a grant applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Tenant,
    User,
    Organization,
    Role,
    Permission,
}

impl Subject {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Tenant => "Tenant",
            Subject::User => "User",
            Subject::Organization => "Organization",
            Subject::Role => "Role",
            Subject::Permission => "Permission",
        }
    }
}

impl FromStr for Subject {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tenant" => Ok(Subject::Tenant),
            "user" => Ok(Subject::User),
            "organization" => Ok(Subject::Organization),
            "role" => Ok(Subject::Role),
            "permission" => Ok(Subject::Permission),
            _ => Err(DomainError::Validation(format!("Unknown subject: {}", s))),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
