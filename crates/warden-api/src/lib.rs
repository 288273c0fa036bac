//! # Warden API
//!
//! Route declarations, the guard middleware that wires authentication, tenant
//! scoping and policy checks in front of every handler, DTOs and the
//! error-to-status mapping.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
