//! Optional first-run administrator account.
//!
//! When `SEED_ADMIN_USERNAME` and `SEED_ADMIN_PASSWORD` are both set and no
//! user with that name exists, one is created and granted every role. This
//! is the only way to create the first account; later accounts are expected
//! to be provisioned in the database.

use backoffice_core::roles::Role;
use backoffice_db::models::user::CreateUser;
use backoffice_db::repositories::UserRepo;
use backoffice_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};

/// Credentials for the bootstrap administrator.
#[derive(Debug, Clone)]
pub struct SeedAdmin {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl SeedAdmin {
    /// Read the seed credentials, if configured.
    pub fn from_env() -> Option<Self> {
        let username = std::env::var("SEED_ADMIN_USERNAME").ok()?;
        let password = std::env::var("SEED_ADMIN_PASSWORD").ok()?;
        let email = std::env::var("SEED_ADMIN_EMAIL")
            .unwrap_or_else(|_| format!("{username}@localhost"));
        Some(Self {
            username,
            password,
            email,
        })
    }
}

/// Create the bootstrap administrator if it does not exist yet.
///
/// The account and its roles are written in one transaction, so a failed
/// run leaves no user behind and the next startup tries again. Returns
/// `true` if a user was created.
pub async fn ensure_admin(pool: &DbPool, seed: &SeedAdmin) -> AppResult<bool> {
    if UserRepo::find_by_username(pool, &seed.username).await?.is_some() {
        return Ok(false);
    }

    validate_password_strength(&seed.password, MIN_PASSWORD_LENGTH).map_err(AppError::BadRequest)?;
    let password_hash = hash_password(&seed.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create_with_roles(
        pool,
        &CreateUser {
            username: seed.username.clone(),
            email: seed.email.clone(),
            password_hash,
        },
        &Role::ALL,
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Seeded administrator account");
    Ok(true)
}
