//! Repository for the `users` table.
//!
//! Accounts are provisioned here and by the bootstrap seed; there is no
//! registration endpoint. The login bookkeeping (failure counter, lockout,
//! last login) is kept in single statements so concurrent attempts against
//! one account cannot lose an increment.

use backoffice_core::roles::Role;
use backoffice_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};
use crate::repositories::RoleRepo;

const COLUMNS: &str = "id, username, email, password_hash, is_active, \
                       last_login_at, failed_login_count, locked_until, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert a user with no roles.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        Self::create_with_roles(pool, input, &[]).await
    }

    /// Insert a user together with its role assignments.
    ///
    /// Either the user and every listed role are committed, or nothing is.
    pub async fn create_with_roles(
        pool: &PgPool,
        input: &CreateUser,
        roles: &[Role],
    ) -> Result<User, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO users (username, email, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(&mut *tx)
            .await?;

        for &role in roles {
            RoleRepo::assign_inner(&mut tx, user.id, role).await?;
        }

        tx.commit().await?;
        Ok(user)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Login names are matched exactly.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Count a wrong password. Once the counter reaches `max_attempts` the
    /// account is locked until `lock_until`.
    ///
    /// Returns the updated row, or `None` if the user vanished.
    pub async fn record_login_failure(
        pool: &PgPool,
        id: DbId,
        max_attempts: i32,
        lock_until: Timestamp,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                failed_login_count = failed_login_count + 1,
                locked_until = CASE
                    WHEN failed_login_count + 1 >= $2 THEN $3
                    ELSE locked_until
                END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(max_attempts)
            .bind(lock_until)
            .fetch_optional(pool)
            .await
    }

    /// Clear the failure counter and any lock, and stamp `last_login_at`.
    pub async fn record_login_success(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET
                failed_login_count = 0,
                locked_until = NULL,
                last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
