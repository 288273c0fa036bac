//! Error-to-status mapping at the request boundary

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use warden_core::DomainError;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Domain(e) => match e {
                DomainError::Unauthenticated(_) | DomainError::PrincipalMissing => StatusCode::UNAUTHORIZED,
                DomainError::Forbidden => StatusCode::FORBIDDEN,
                DomainError::NotFound(_) => StatusCode::NOT_FOUND,
                DomainError::DuplicateConstraint { .. } | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
                DomainError::MissingTenantContext | DomainError::Database(_) | DomainError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            ApiError::Validation(e) => {
                warn!("Validation failed: {}", e);
                ("VALIDATION_ERROR", e.to_string())
            }
            ApiError::Domain(e) => match e {
                DomainError::Unauthenticated(reason) => {
                    warn!("Unauthenticated: {}", reason);
                    ("UNAUTHENTICATED", "Authentication required".to_string())
                }
                DomainError::PrincipalMissing => {
                    warn!("No principal attached to scoped request");
                    ("UNAUTHENTICATED", "Authentication required".to_string())
                }
                DomainError::Forbidden => {
                    warn!("Forbidden");
                    ("FORBIDDEN", "Access denied".to_string())
                }
                DomainError::NotFound(entity) => ("NOT_FOUND", format!("{} not found", entity)),
                DomainError::DuplicateConstraint { .. } => ("DUPLICATE", e.to_string()),
                DomainError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
                DomainError::MissingTenantContext => {
                    error!(target: "warden::tenancy", "Request failed without tenant context");
                    ("INTERNAL_ERROR", "Internal server error".to_string())
                }
                DomainError::Database(msg) | DomainError::Internal(msg) => {
                    error!("Request failed: {}", msg);
                    ("INTERNAL_ERROR", "Internal server error".to_string())
                }
            },
        };

        (status, Json(ApiResponse::<()>::error(code, &message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::Unauthenticated("x".into()), StatusCode::UNAUTHORIZED),
            (DomainError::PrincipalMissing, StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden, StatusCode::FORBIDDEN),
            (DomainError::NotFound("Organization".into()), StatusCode::NOT_FOUND),
            (DomainError::duplicate("user.email", "a@b.c"), StatusCode::BAD_REQUEST),
            (DomainError::MissingTenantContext, StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::Database("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }
}
