//! # Warden Core - Domain Module
//!
//! Domain entities for the Warden multi-tenant backend.

pub mod entity;
pub mod organization;
pub mod principal;
pub mod role;
pub mod tenant;
pub mod user;

pub use entity::{Entity, EntityKind};
pub use organization::Organization;
pub use principal::Principal;
pub use role::{Permission, Role};
pub use tenant::Tenant;
pub use user::User;

pub use warden_shared::TenantId;
