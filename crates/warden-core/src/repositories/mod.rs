//! Repository traits (ports)
//!
//! Every operation on a tenant-owned kind takes a [`QueryScope`]; adapters must
//! conjoin `tenant_id = <scope tenant>` for [`QueryScope::Tenant`]. Callers go
//! through [`crate::session::DataSession`], which supplies the scope.

pub mod memory;
pub mod organization_repository;
pub mod role_repository;
pub mod scope;
pub mod tenant_repository;
pub mod user_repository;

pub use memory::InMemoryStore;
pub use organization_repository::OrganizationRepository;
pub use role_repository::RoleRepository;
pub use scope::QueryScope;
pub use tenant_repository::TenantRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use user_repository::MockUserRepository;
