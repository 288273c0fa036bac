// ============================================================================
// Warden API - Auth Handlers
// File: crates/warden-api/src/handlers/auth.rs
// ============================================================================
//! Registration, login and token refresh. All public routes: the session they
//! receive carries no tenant filter.

use axum::{extract::State, http::StatusCode, Extension, Json};
use validator::Validate;

use warden_core::services::{AuthTokens, RegisterInput};
use warden_core::DataSession;

use crate::dto::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, TenantResponse};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Extension(session): Extension<DataSession>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    payload.validate()?;

    let result = state
        .auth
        .register(
            &session,
            RegisterInput {
                username: payload.username,
                email: payload.email,
                password: payload.password,
                tenant: payload.tenant,
            },
        )
        .await?;

    let response = AuthResponse {
        user: result.user.into(),
        tenant: Some(TenantResponse::new(result.tenant, &state.tenancy.root_domain)),
        tokens: result.tokens,
    };
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Extension(session): Extension<DataSession>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    payload.validate()?;

    let result = state.auth.login(&session, &payload.login, &payload.password).await?;
    Ok(Json(ApiResponse::success(AuthResponse {
        user: result.user.into(),
        tenant: None,
        tokens: result.tokens,
    })))
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Extension(session): Extension<DataSession>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<AuthTokens>>, ApiError> {
    payload.validate()?;

    let tokens = state.auth.refresh(&session, &payload.refresh_token).await?;
    Ok(Json(ApiResponse::success(tokens)))
}
