//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! grocer-cli admin create -e admin@example.com -u "Admin" -w "a strong password"
//! ```
//!
//! Admin accounts can only be provisioned here; the public registration
//! endpoint never grants the admin role.
//!
//! # Environment Variables
//!
//! - `GROCER_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use greengrocer_core::Email;

use super::{CommandError, database_url};

/// Create a new admin account.
///
/// # Errors
///
/// Returns `CommandError::AccountExists` if the email is already
/// registered, `CommandError::InvalidEmail` if it does not parse.
pub async fn create(
    email: &str,
    username: &str,
    phone: &str,
    password: &str,
) -> Result<i32, CommandError> {
    let email = Email::parse(email).map_err(|e| CommandError::InvalidEmail(e.to_string()))?;

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Creating admin account: {email}");

    let existing: Option<i32> =
        sqlx::query_scalar("SELECT id FROM store.customer WHERE email = $1")
            .bind(email.as_str())
            .fetch_optional(&pool)
            .await?;

    if existing.is_some() {
        return Err(CommandError::AccountExists(email.to_string()));
    }

    let password_hash = hash_password(password)?;

    let id: i32 = sqlx::query_scalar(
        "INSERT INTO store.customer (username, email, phone, password_hash, is_admin)
         VALUES ($1, $2, $3, $4, TRUE)
         RETURNING id",
    )
    .bind(username)
    .bind(email.as_str())
    .bind(phone)
    .bind(&password_hash)
    .fetch_one(&pool)
    .await?;

    tracing::info!("Admin account created with id {id}");
    Ok(id)
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, CommandError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| CommandError::PasswordHash)
}
