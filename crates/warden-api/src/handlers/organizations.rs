// ============================================================================
// Warden API - Organization Handlers
// File: crates/warden-api/src/handlers/organizations.rs
// ============================================================================

use axum::{extract::Path, http::StatusCode, Extension, Json};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use warden_core::services::OrganizationService;
use warden_core::DataSession;

use crate::dto::{CreateOrganizationRequest, OrganizationResponse, UpdateOrganizationRequest};
use crate::error::ApiError;
use crate::response::ApiResponse;

/// GET /api/v1/organizations
pub async fn list(
    Extension(session): Extension<DataSession>,
) -> Result<Json<ApiResponse<Vec<OrganizationResponse>>>, ApiError> {
    let organizations = OrganizationService::new(&session).list().await?;
    Ok(Json(ApiResponse::success(
        organizations.into_iter().map(Into::into).collect(),
    )))
}

/// POST /api/v1/organizations
pub async fn create(
    Extension(session): Extension<DataSession>,
    Json(payload): Json<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrganizationResponse>>), ApiError> {
    payload.validate()?;
    if let Some(supplied) = payload.tenant_id {
        debug!(supplied = %supplied, "Ignoring caller-supplied tenant");
    }

    let organization = OrganizationService::new(&session)
        .create(payload.name, payload.description)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(organization.into()))))
}

/// GET /api/v1/organizations/{id}
pub async fn get(
    Extension(session): Extension<DataSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrganizationResponse>>, ApiError> {
    let organization = OrganizationService::new(&session).get(&id).await?;
    Ok(Json(ApiResponse::success(organization.into())))
}

/// PATCH /api/v1/organizations/{id}
pub async fn update(
    Extension(session): Extension<DataSession>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrganizationRequest>,
) -> Result<Json<ApiResponse<OrganizationResponse>>, ApiError> {
    payload.validate()?;

    let organization = OrganizationService::new(&session)
        .update(&id, payload.name, payload.description)
        .await?;
    Ok(Json(ApiResponse::success(organization.into())))
}

/// DELETE /api/v1/organizations/{id}
pub async fn delete(
    Extension(session): Extension<DataSession>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    OrganizationService::new(&session).delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
