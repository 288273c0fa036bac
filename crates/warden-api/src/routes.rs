//! Route table: every route declares its access level and policies.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post, MethodRouter},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use warden_core::authorization::policy::{can, can_any_or_own};
use warden_core::authorization::{Action, Subject};

use crate::handlers::{auth, health, organizations, tenants, users};
use crate::middleware::{enforce, GuardState, RouteGuard};
use crate::state::AppState;

fn guarded(state: &AppState, guard: RouteGuard, route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    let guard_state = GuardState {
        app: state.clone(),
        guard: Arc::new(guard),
    };
    route.route_layer(middleware::from_fn_with_state(guard_state, enforce))
}

pub fn build_router(state: AppState) -> Router {
    let s = &state;
    let public = RouteGuard::public;
    let authenticated = RouteGuard::authenticated;

    Router::new()
        .route("/health", guarded(s, public(), get(health::health_check)))
        // Bootstrap and credentials
        .route("/api/v1/auth/register", guarded(s, public(), post(auth::register)))
        .route("/api/v1/auth/login", guarded(s, public(), post(auth::login)))
        .route("/api/v1/auth/refresh", guarded(s, public(), post(auth::refresh)))
        // Users
        .route("/api/v1/users/me", guarded(s, authenticated(vec![]), get(users::me)))
        .route(
            "/api/v1/users",
            guarded(s, authenticated(vec![can(Action::ReadAny, Subject::User)]), get(users::list)),
        )
        .route(
            "/api/v1/users/{id}",
            guarded(
                s,
                authenticated(vec![can_any_or_own(Action::ReadAny, Action::ReadOwn, Subject::User, "id")]),
                get(users::get),
            ),
        )
        // Organizations
        .route(
            "/api/v1/organizations",
            guarded(
                s,
                authenticated(vec![can(Action::ReadAny, Subject::Organization)]),
                get(organizations::list),
            ),
        )
        .route(
            "/api/v1/organizations",
            guarded(
                s,
                authenticated(vec![can(Action::Create, Subject::Organization)]),
                post(organizations::create),
            ),
        )
        .route(
            "/api/v1/organizations/{id}",
            guarded(
                s,
                authenticated(vec![can(Action::ReadAny, Subject::Organization)]),
                get(organizations::get),
            ),
        )
        .route(
            "/api/v1/organizations/{id}",
            guarded(
                s,
                authenticated(vec![can(Action::UpdateAny, Subject::Organization)]),
                patch(organizations::update),
            ),
        )
        .route(
            "/api/v1/organizations/{id}",
            guarded(
                s,
                authenticated(vec![can(Action::DeleteAny, Subject::Organization)]),
                delete(organizations::delete),
            ),
        )
        // Tenant and reference data
        .route(
            "/api/v1/tenant",
            guarded(s, authenticated(vec![can(Action::ReadOwn, Subject::Tenant)]), get(tenants::current)),
        )
        .route(
            "/api/v1/roles",
            guarded(
                s,
                RouteGuard::skip_tenant_scope(vec![can(Action::ReadAny, Subject::Role)]),
                get(tenants::roles),
            ),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
