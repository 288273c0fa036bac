// ============================================================================
// Warden API - Route Guard
// File: crates/warden-api/src/middleware/guard.rs
// ============================================================================
//! Per-route guard: opens the request context and the data session, resolves
//! the principal, installs the tenant filter and evaluates the route's
//! policies, in that order, before the handler runs.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
    RequestExt,
};
use tracing::{debug, warn};

use warden_core::authorization::{AbilityFactory, Policy, PolicyEvaluator, RequestInfo};
use warden_core::tenancy::{context, install_tenant_filter, RouteAccess};

use crate::error::ApiError;
use crate::state::AppState;

/// Access level and ordered policies declared for one route.
#[derive(Clone)]
pub struct RouteGuard {
    pub access: RouteAccess,
    pub policies: Vec<Policy>,
}

impl RouteGuard {
    pub fn public() -> Self {
        Self {
            access: RouteAccess::Public,
            policies: Vec::new(),
        }
    }

    pub fn authenticated(policies: Vec<Policy>) -> Self {
        Self {
            access: RouteAccess::Authenticated,
            policies,
        }
    }

    pub fn skip_tenant_scope(policies: Vec<Policy>) -> Self {
        Self {
            access: RouteAccess::SkipTenantScope,
            policies,
        }
    }
}

#[derive(Clone)]
pub struct GuardState {
    pub app: AppState,
    pub guard: Arc<RouteGuard>,
}

/// `Authorization: Bearer <token>` -> `<token>`.
pub fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

pub async fn enforce(State(state): State<GuardState>, request: Request, next: Next) -> Response {
    // Everything downstream, handler included, runs inside this request's context
    context::scope(async move {
        match guarded(state, request, next).await {
            Ok(response) => response,
            Err(e) => e.into_response(),
        }
    })
    .await
}

async fn guarded(state: GuardState, mut request: Request, next: Next) -> Result<Response, ApiError> {
    let guard = state.guard;
    let mut session = state.app.open_session();

    let principal = if guard.access.requires_principal() {
        let token = bearer_token(&request);
        Some(state.app.resolver.resolve(token.as_deref()).await?)
    } else {
        None
    };

    install_tenant_filter(&mut session, guard.access, principal.as_ref())?;

    if let Some(principal) = &principal {
        let params = request
            .extract_parts::<Path<HashMap<String, String>>>()
            .await
            .map(|Path(params)| params)
            .unwrap_or_default();
        let info = RequestInfo {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            params,
        };
        let ability = AbilityFactory::for_principal(principal);
        if let Err(e) = PolicyEvaluator::authorize(&guard.policies, &ability, principal, &info) {
            warn!(user_id = %principal.user_id, method = %info.method, path = %info.path, "Policy check failed");
            return Err(e.into());
        }
        debug!(user_id = %principal.user_id, path = %info.path, "Request authorized");
        request.extensions_mut().insert(principal.clone());
    }

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
