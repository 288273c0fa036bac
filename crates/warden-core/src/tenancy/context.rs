// ============================================================================
// Warden Core - Request Context Store
// File: crates/warden-core/src/tenancy/context.rs
// ============================================================================
//! Request-scoped tenant slot.
//!
//! Backed by a tokio task-local, so the value follows every `.await` of the
//! request's future without threading it through call signatures, and two
//! concurrent requests never see each other's slot. Work moved onto another
//! task must go through [`spawn_scoped`] to keep the slot.
//!
//! Only the principal resolver writes the slot (`set_tenant` is crate-private).

use std::future::Future;
use std::sync::{Arc, OnceLock};

use tokio::task::JoinHandle;
use tracing::error;

use crate::domain::TenantId;
use crate::error::{DomainError, DomainResult};

tokio::task_local! {
    static REQUEST_CONTEXT: Arc<RequestContext>;
}

#[derive(Debug, Default)]
pub struct RequestContext {
    tenant: OnceLock<TenantId>,
}

impl RequestContext {
    pub fn tenant(&self) -> Option<TenantId> {
        self.tenant.get().copied()
    }
}

/// Runs `future` with a fresh, empty context. One call per inbound request.
pub async fn scope<F>(future: F) -> F::Output
where
    F: Future,
{
    REQUEST_CONTEXT
        .scope(Arc::new(RequestContext::default()), future)
        .await
}

pub fn is_active() -> bool {
    REQUEST_CONTEXT.try_with(|_| ()).is_ok()
}

/// Binds the tenant for the rest of the request. Write-once: rebinding to the
/// same tenant is a no-op, rebinding to another one is rejected.
pub(crate) fn set_tenant(tenant_id: TenantId) -> DomainResult<()> {
    REQUEST_CONTEXT
        .try_with(|ctx| match ctx.tenant.set(tenant_id) {
            Ok(()) => Ok(()),
            Err(_) if ctx.tenant() == Some(tenant_id) => Ok(()),
            Err(_) => {
                error!(target: "warden::tenancy", "Request context already bound to another tenant");
                Err(DomainError::Internal(
                    "request context already bound to another tenant".to_string(),
                ))
            }
        })
        .map_err(|_| {
            error!(target: "warden::tenancy", "Tenant written outside of a request scope");
            DomainError::Internal("no request context established".to_string())
        })?
}

pub fn current_tenant() -> Option<TenantId> {
    REQUEST_CONTEXT.try_with(|ctx| ctx.tenant()).ok().flatten()
}

/// The bound tenant, or `MissingTenantContext`.
pub fn require_tenant() -> DomainResult<TenantId> {
    current_tenant().ok_or_else(|| {
        error!(target: "warden::tenancy", "Tenant required but request context is empty");
        DomainError::MissingTenantContext
    })
}

/// `tokio::spawn` that carries the caller's request context into the new task.
pub fn spawn_scoped<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    match REQUEST_CONTEXT.try_with(Arc::clone) {
        Ok(ctx) => tokio::spawn(REQUEST_CONTEXT.scope(ctx, future)),
        Err(_) => tokio::spawn(future),
    }
}
