// ============================================================================
// Warden Infrastructure - PostgreSQL Role Repository
// File: crates/warden-infrastructure/src/database/postgres/role_repo_impl.rs
// ============================================================================
//! Roles with their permissions, read-only reference data.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use warden_core::domain::{Permission, Role};
use warden_core::repositories::RoleRepository;
use warden_core::DomainError;

use super::database_error;

pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// One row per (role, permission); permission columns are NULL for a role
/// without permissions.
#[derive(Debug, FromRow)]
pub(crate) struct RolePermissionRow {
    pub role_id: Uuid,
    pub role_name: String,
    pub permission_id: Option<Uuid>,
    pub permission_name: Option<String>,
    pub action: Option<String>,
    pub subject: Option<String>,
}

const ROLE_SELECT: &str = r#"
    SELECT r.id AS role_id, r.name AS role_name,
           p.id AS permission_id, p.name AS permission_name, p.action, p.subject
    FROM roles r
    LEFT JOIN role_permissions rp ON rp.role_id = r.id
    LEFT JOIN permissions p ON p.id = rp.permission_id
"#;

/// Folds joined rows into roles, keeping first-seen role order.
pub(crate) fn roles_from_rows(rows: Vec<RolePermissionRow>) -> Result<Vec<Role>, DomainError> {
    let mut roles: Vec<Role> = Vec::new();
    for row in rows {
        let index = match roles.iter().position(|r| r.id == row.role_id) {
            Some(index) => index,
            None => {
                roles.push(Role {
                    id: row.role_id,
                    name: row.role_name.clone(),
                    permissions: Vec::new(),
                });
                roles.len() - 1
            }
        };
        if let (Some(id), Some(name), Some(action), Some(subject)) =
            (row.permission_id, row.permission_name, row.action, row.subject)
        {
            roles[index].permissions.push(Permission {
                id,
                name,
                action: action
                    .parse()
                    .map_err(|e: DomainError| DomainError::Database(e.to_string()))?,
                subject: subject
                    .parse()
                    .map_err(|e: DomainError| DomainError::Database(e.to_string()))?,
            });
        }
    }
    Ok(roles)
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Role>, DomainError> {
        let sql = format!("{} WHERE r.id = $1", ROLE_SELECT);
        let rows: Vec<RolePermissionRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("finding role by id", e))?;

        Ok(roles_from_rows(rows)?.into_iter().next())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DomainError> {
        let sql = format!("{} WHERE r.name = $1", ROLE_SELECT);
        let rows: Vec<RolePermissionRow> = sqlx::query_as(&sql)
            .bind(name)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("finding role by name", e))?;

        Ok(roles_from_rows(rows)?.into_iter().next())
    }

    async fn list(&self) -> Result<Vec<Role>, DomainError> {
        let sql = format!("{} ORDER BY r.name, p.name", ROLE_SELECT);
        let rows: Vec<RolePermissionRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("listing roles", e))?;

        roles_from_rows(rows)
    }
}
