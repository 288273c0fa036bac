use axum::Json;
use serde_json::{json, Value};

use crate::response::ApiResponse;

/// GET /health
pub async fn health_check() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
