//! # Warden Infrastructure
//!
//! PostgreSQL adapters for the `warden-core` repository ports.

pub mod database;

pub use database::{
    create_pool, run_migrations, PgOrganizationRepository, PgRoleRepository, PgTenantRepository,
    PgUserRepository,
};

use sqlx::PgPool;
use std::sync::Arc;
use warden_core::Repositories;

/// Repository bundle backed by one shared pool.
pub fn pg_repositories(pool: PgPool) -> Repositories {
    Repositories {
        tenants: Arc::new(PgTenantRepository::new(pool.clone())),
        users: Arc::new(PgUserRepository::new(pool.clone())),
        organizations: Arc::new(PgOrganizationRepository::new(pool.clone())),
        roles: Arc::new(PgRoleRepository::new(pool)),
    }
}
