//! Domain errors

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Missing, malformed, expired or forged credential, or the user behind it is gone.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// A scoped route was reached without an attached principal.
    #[error("No principal attached to the request")]
    PrincipalMissing,

    /// Internal invariant violation: tenant-scoped work ran without a tenant.
    #[error("Tenant context missing")]
    MissingTenantContext,

    #[error("Forbidden")]
    Forbidden,

    #[error("{field} already exists: {value}")]
    DuplicateConstraint { field: String, value: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DomainError::DuplicateConstraint {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::Validation(errors.to_string())
    }
}
