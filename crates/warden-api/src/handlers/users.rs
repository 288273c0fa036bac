//! User handlers

use axum::{extract::Path, Extension, Json};
use uuid::Uuid;

use warden_core::services::UserService;
use warden_core::{DataSession, Principal};

use crate::dto::{MeResponse, UserResponse};
use crate::error::ApiError;
use crate::response::ApiResponse;

/// GET /api/v1/users/me
pub async fn me(Extension(principal): Extension<Principal>) -> Json<ApiResponse<MeResponse>> {
    Json(ApiResponse::success(principal.into()))
}

/// GET /api/v1/users
pub async fn list(Extension(session): Extension<DataSession>) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    let users = UserService::new(&session).list().await?;
    Ok(Json(ApiResponse::success(users.into_iter().map(Into::into).collect())))
}

/// GET /api/v1/users/{id}
pub async fn get(
    Extension(session): Extension<DataSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = UserService::new(&session).get(&id).await?;
    Ok(Json(ApiResponse::success(user.into())))
}
