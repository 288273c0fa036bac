//! Request guard middleware

pub mod guard;

pub use guard::{bearer_token, enforce, GuardState, RouteGuard};
