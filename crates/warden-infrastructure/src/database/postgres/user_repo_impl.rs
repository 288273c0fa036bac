// ============================================================================
// Warden Infrastructure - PostgreSQL User Repository
// File: crates/warden-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use warden_core::domain::{Principal, TenantId, User};
use warden_core::repositories::{QueryScope, UserRepository};
use warden_core::DomainError;

use super::role_repo_impl::{roles_from_rows, RolePermissionRow};
use super::{database_error, scope_param, unique_violation};

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: Uuid,
    pub tenant_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role_id: row.role_id,
            tenant_id: Some(TenantId::from_uuid(row.tenant_id)),
            is_active: row.is_active,
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }
}

/// User joined with role and permissions: one row per permission.
#[derive(Debug, FromRow)]
struct PrincipalRow {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub tenant_id: Uuid,
    pub role_id: Uuid,
    pub role_name: String,
    pub permission_id: Option<Uuid>,
    pub permission_name: Option<String>,
    pub action: Option<String>,
    pub subject: Option<String>,
}

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role_id, tenant_id, is_active, created_at, modified_at";

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, scope: &QueryScope, id: &Uuid) -> Result<Option<User>, DomainError> {
        let sql = format!(
            "SELECT {} FROM users WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)",
            USER_COLUMNS
        );
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(scope_param(scope))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("finding user by id", e))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_username(&self, scope: &QueryScope, username: &str) -> Result<Option<User>, DomainError> {
        let sql = format!(
            "SELECT {} FROM users WHERE username = $1 AND ($2::uuid IS NULL OR tenant_id = $2)",
            USER_COLUMNS
        );
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(username)
            .bind(scope_param(scope))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("finding user by username", e))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_email(&self, scope: &QueryScope, email: &str) -> Result<Option<User>, DomainError> {
        let sql = format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1) AND ($2::uuid IS NULL OR tenant_id = $2)",
            USER_COLUMNS
        );
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(email)
            .bind(scope_param(scope))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("finding user by email", e))?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, scope: &QueryScope) -> Result<Vec<User>, DomainError> {
        let sql = format!(
            "SELECT {} FROM users WHERE ($1::uuid IS NULL OR tenant_id = $1) ORDER BY created_at",
            USER_COLUMNS
        );
        let rows: Vec<UserRow> = sqlx::query_as(&sql)
            .bind(scope_param(scope))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("listing users", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, user: &User) -> Result<User, DomainError> {
        let tenant_id = user.tenant_id.ok_or(DomainError::MissingTenantContext)?;

        let sql = format!(
            "INSERT INTO users ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {cols}",
            cols = USER_COLUMNS
        );
        let row: UserRow = sqlx::query_as(&sql)
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role_id)
            .bind(tenant_id.as_uuid())
            .bind(user.is_active)
            .bind(user.created_at)
            .bind(user.modified_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match unique_violation(&e).as_deref() {
                Some("users_username_key") => DomainError::duplicate("user.username", user.username.clone()),
                Some("users_email_key") => DomainError::duplicate("user.email", user.email.clone()),
                _ => database_error("creating user", e),
            })?;

        info!("User created: {}", row.id);
        Ok(row.into())
    }

    async fn find_principal(&self, id: &Uuid) -> Result<Option<Principal>, DomainError> {
        let rows: Vec<PrincipalRow> = sqlx::query_as(
            r#"
            SELECT u.id AS user_id, u.username, u.email, u.tenant_id,
                   r.id AS role_id, r.name AS role_name,
                   p.id AS permission_id, p.name AS permission_name, p.action, p.subject
            FROM users u
            JOIN roles r ON r.id = u.role_id
            LEFT JOIN role_permissions rp ON rp.role_id = r.id
            LEFT JOIN permissions p ON p.id = rp.permission_id
            WHERE u.id = $1
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("loading principal", e))?;

        let Some(first) = rows.first() else {
            return Ok(None);
        };
        let user_id = first.user_id;
        let username = first.username.clone();
        let email = first.email.clone();
        let tenant_id = TenantId::from_uuid(first.tenant_id);

        let role_rows = rows
            .into_iter()
            .map(|row| RolePermissionRow {
                role_id: row.role_id,
                role_name: row.role_name,
                permission_id: row.permission_id,
                permission_name: row.permission_name,
                action: row.action,
                subject: row.subject,
            })
            .collect();
        let role = roles_from_rows(role_rows)?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::Database(format!("role of user {} missing", user_id)))?;

        Ok(Some(Principal {
            user_id,
            username,
            email,
            role,
            tenant_id: Some(tenant_id),
        }))
    }
}
