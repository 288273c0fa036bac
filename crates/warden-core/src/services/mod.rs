//! Domain services (business logic)

pub mod auth_service;
pub mod organization_service;
pub mod principal_resolver;
pub mod user_service;

pub use auth_service::{AuthService, AuthTokens, LoginResult, RegisterInput, RegisterResult};
pub use organization_service::OrganizationService;
pub use principal_resolver::PrincipalResolver;
pub use user_service::UserService;
