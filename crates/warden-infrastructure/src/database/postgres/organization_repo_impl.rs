// ============================================================================
// Warden Infrastructure - PostgreSQL Organization Repository
// File: crates/warden-infrastructure/src/database/postgres/organization_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use warden_core::domain::{Organization, TenantId};
use warden_core::repositories::{OrganizationRepository, QueryScope};
use warden_core::DomainError;

use super::{database_error, scope_param};

pub struct PgOrganizationRepository {
    pool: PgPool,
}

impl PgOrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OrganizationRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub tenant_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<OrganizationRow> for Organization {
    fn from(row: OrganizationRow) -> Self {
        Organization {
            id: row.id,
            name: row.name,
            description: row.description,
            tenant_id: Some(TenantId::from_uuid(row.tenant_id)),
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }
}

#[async_trait]
impl OrganizationRepository for PgOrganizationRepository {
    async fn find_by_id(&self, scope: &QueryScope, id: &Uuid) -> Result<Option<Organization>, DomainError> {
        let row: Option<OrganizationRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, tenant_id, created_at, modified_at
            FROM organizations
            WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)
            "#,
        )
        .bind(id)
        .bind(scope_param(scope))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("finding organization", e))?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, scope: &QueryScope) -> Result<Vec<Organization>, DomainError> {
        let rows: Vec<OrganizationRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, tenant_id, created_at, modified_at
            FROM organizations
            WHERE ($1::uuid IS NULL OR tenant_id = $1)
            ORDER BY created_at
            "#,
        )
        .bind(scope_param(scope))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("listing organizations", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, organization: &Organization) -> Result<Organization, DomainError> {
        let tenant_id = organization
            .tenant_id
            .ok_or(DomainError::MissingTenantContext)?;

        let row: OrganizationRow = sqlx::query_as(
            r#"
            INSERT INTO organizations (id, name, description, tenant_id, created_at, modified_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, tenant_id, created_at, modified_at
            "#,
        )
        .bind(organization.id)
        .bind(&organization.name)
        .bind(&organization.description)
        .bind(tenant_id.as_uuid())
        .bind(organization.created_at)
        .bind(organization.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| database_error("creating organization", e))?;

        Ok(row.into())
    }

    async fn update(&self, scope: &QueryScope, organization: &Organization) -> Result<Option<Organization>, DomainError> {
        let row: Option<OrganizationRow> = sqlx::query_as(
            r#"
            UPDATE organizations
            SET name = $2, description = $3, modified_at = $4
            WHERE id = $1 AND ($5::uuid IS NULL OR tenant_id = $5)
            RETURNING id, name, description, tenant_id, created_at, modified_at
            "#,
        )
        .bind(organization.id)
        .bind(&organization.name)
        .bind(&organization.description)
        .bind(organization.modified_at)
        .bind(scope_param(scope))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("updating organization", e))?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, scope: &QueryScope, id: &Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)")
            .bind(id)
            .bind(scope_param(scope))
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("deleting organization", e))?;

        Ok(result.rows_affected() > 0)
    }
}
