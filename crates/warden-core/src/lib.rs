//! # Warden Core
//!
//! Domain entities, repository ports, tenant isolation, and capability-based
//! authorization for the Warden multi-tenant backend.
//!
//! Per request the flow is: [`services::PrincipalResolver`] authenticates and
//! binds the tenant into the request context, [`tenancy::install_tenant_filter`]
//! scopes the [`session::DataSession`], and [`authorization::PolicyEvaluator`]
//! checks the route's policies against an [`authorization::Ability`].

pub mod authorization;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;
pub mod session;
pub mod tenancy;

pub use domain::*;
pub use error::{DomainError, DomainResult};
pub use session::{DataSession, Repositories};
