//! Tenant and role handlers

use axum::{extract::State, Extension, Json};

use warden_core::services::UserService;
use warden_core::{DataSession, Principal};

use crate::dto::{RoleResponse, TenantResponse};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/tenant
pub async fn current(
    State(state): State<AppState>,
    Extension(session): Extension<DataSession>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ApiResponse<TenantResponse>>, ApiError> {
    let tenant = UserService::new(&session).tenant_of(&principal).await?;
    Ok(Json(ApiResponse::success(TenantResponse::new(
        tenant,
        &state.tenancy.root_domain,
    ))))
}

/// GET /api/v1/roles
pub async fn roles(Extension(session): Extension<DataSession>) -> Result<Json<ApiResponse<Vec<RoleResponse>>>, ApiError> {
    let roles = UserService::new(&session).roles().await?;
    Ok(Json(ApiResponse::success(roles.into_iter().map(Into::into).collect())))
}
