//! Repository for the `roles` and `user_roles` tables.

use backoffice_core::roles::{parse_roles, Role};
use backoffice_core::types::DbId;
use sqlx::PgPool;

use crate::models::role::RoleRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_at, updated_at";

const ASSIGN_SQL: &str = "INSERT INTO user_roles (user_id, role_id)
                          SELECT $1, id FROM roles WHERE name = $2
                          ON CONFLICT ON CONSTRAINT uq_user_roles_user_role DO NOTHING";

/// Provides role lookups and assignments.
pub struct RoleRepo;

impl RoleRepo {
    /// List all roles ordered by ID ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<RoleRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles ORDER BY id ASC");
        sqlx::query_as::<_, RoleRow>(&query).fetch_all(pool).await
    }

    /// Names of every role assigned to a user, ordered by role ID.
    pub async fn role_names_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT r.name FROM user_roles ur
             JOIN roles r ON r.id = ur.role_id
             WHERE ur.user_id = $1
             ORDER BY r.id ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Roles held by a user, restricted to the known enumeration.
    pub async fn roles_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Role>, sqlx::Error> {
        let names = Self::role_names_for_user(pool, user_id).await?;
        Ok(parse_roles(&names))
    }

    /// Grant a role to a user. Granting a role the user already holds is a
    /// no-op. Returns `true` if a new assignment was created.
    pub async fn assign(pool: &PgPool, user_id: DbId, role: Role) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(ASSIGN_SQL)
            .bind(user_id)
            .bind(role.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// [`RoleRepo::assign`] inside a caller-owned transaction.
    pub(crate) async fn assign_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: DbId,
        role: Role,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(ASSIGN_SQL)
            .bind(user_id)
            .bind(role.as_str())
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a role from a user. Returns `true` if an assignment was removed.
    pub async fn revoke(pool: &PgPool, user_id: DbId, role: Role) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM user_roles
             WHERE user_id = $1
               AND role_id = (SELECT id FROM roles WHERE name = $2)",
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
