// ============================================================================
// Warden Infrastructure - PostgreSQL Tenant Repository
// File: crates/warden-infrastructure/src/database/postgres/tenant_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use warden_core::domain::{Tenant, TenantId};
use warden_core::repositories::TenantRepository;
use warden_core::DomainError;

use super::{database_error, unique_violation};

pub struct PgTenantRepository {
    pool: PgPool,
}

impl PgTenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct TenantRow {
    pub id: Uuid,
    pub domain: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Tenant {
            id: TenantId::from_uuid(row.id),
            domain: row.domain,
            is_active: row.is_active,
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }
}

#[async_trait]
impl TenantRepository for PgTenantRepository {
    async fn find_by_id(&self, id: &TenantId) -> Result<Option<Tenant>, DomainError> {
        let row: Option<TenantRow> = sqlx::query_as(
            r#"
            SELECT id, domain, is_active, created_at, modified_at
            FROM tenants
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("finding tenant by id", e))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_domain(&self, domain: &str) -> Result<Option<Tenant>, DomainError> {
        let row: Option<TenantRow> = sqlx::query_as(
            r#"
            SELECT id, domain, is_active, created_at, modified_at
            FROM tenants
            WHERE LOWER(domain) = LOWER($1)
            "#,
        )
        .bind(domain)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("finding tenant by domain", e))?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, tenant: &Tenant) -> Result<Tenant, DomainError> {
        let row: TenantRow = sqlx::query_as(
            r#"
            INSERT INTO tenants (id, domain, is_active, created_at, modified_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, domain, is_active, created_at, modified_at
            "#,
        )
        .bind(tenant.id.as_uuid())
        .bind(&tenant.domain)
        .bind(tenant.is_active)
        .bind(tenant.created_at)
        .bind(tenant.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(_) => DomainError::duplicate("tenant.domain", tenant.domain.clone()),
            None => database_error("creating tenant", e),
        })?;

        info!("Tenant created: {} ({})", row.domain, row.id);
        Ok(row.into())
    }

    async fn delete(&self, id: &TenantId) -> Result<bool, DomainError> {
        // organizations and users go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("deleting tenant", e))?;

        Ok(result.rows_affected() > 0)
    }
}
