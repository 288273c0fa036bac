//! Role and permission reference data

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::authorization::{Action, Subject};

/// A named (action, subject) grant. Names are globally unique; the pair is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: Uuid,
    pub name: String,
    pub action: Action,
    pub subject: Subject,
}

impl Permission {
    pub fn new(name: impl Into<String>, action: Action, subject: Subject) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            action,
            subject,
        }
    }
}

/// A named set of permissions. Order of `permissions` carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub permissions: Vec<Permission>,
}

impl Role {
    pub fn new(name: impl Into<String>, permissions: Vec<Permission>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            permissions,
        }
    }
}
