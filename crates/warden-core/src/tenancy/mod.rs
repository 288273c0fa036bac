//! Tenant isolation: the request context store, before-persist hooks and the
//! scope filter installed on each request's data session.

pub mod context;
pub mod filter;
pub mod hooks;

pub use filter::{install_tenant_filter, RouteAccess, TenantFilter};
pub use hooks::{BeforePersistHook, HookRegistry, HookRegistryBuilder};
