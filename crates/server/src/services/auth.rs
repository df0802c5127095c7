//! Registration and login.
//!
//! Passwords are hashed with Argon2id and never stored or logged in the
//! clear. Successful authentication yields a signed bearer token carrying
//! the customer profile; see [`crate::middleware::auth`].

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use greengrocer_core::{Email, EmailError};

use crate::db::{CustomerRepository, RepositoryError};
use crate::middleware::auth::{Claims, CurrentCustomer, issue_token};

/// Minimum accepted password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors from registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    InvalidEmail(#[from] EmailError),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email already registered")]
    EmailTaken,

    #[error("{0}")]
    WeakPassword(String),

    #[error("failed to hash password")]
    PasswordHash,

    #[error("token error")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Authentication service.
pub struct AuthService<'a> {
    customers: CustomerRepository<'a>,
    jwt_secret: &'a SecretString,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, jwt_secret: &'a SecretString) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
            jwt_secret,
        }
    }

    /// Register a new customer account and sign them in.
    ///
    /// New accounts never get the admin role through this path; admins are
    /// provisioned out of band.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::WeakPassword` if
    /// validation fails, `AuthError::EmailTaken` if the email is already
    /// registered.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        phone: &str,
        password: &str,
    ) -> Result<String, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let customer = self
            .customers
            .create(username, &email, phone, &password_hash, false)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        let claims = Claims::new(
            customer.email.as_str(),
            &customer.username,
            &customer.phone,
            customer.is_admin,
        );
        Ok(issue_token(&claims, self.jwt_secret)?)
    }

    /// Authenticate a customer and issue a token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a
    /// wrong password; the two cases are indistinguishable to the caller.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(String, CurrentCustomer), AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let customer = self
            .customers
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &customer.password_hash)?;

        let claims = Claims::new(
            customer.email.as_str(),
            &customer.username,
            &customer.phone,
            customer.is_admin,
        );
        let token = issue_token(&claims, self.jwt_secret)?;

        Ok((
            token,
            CurrentCustomer {
                email,
                username: customer.username,
                phone: customer.phone,
                is_admin: customer.is_admin,
            },
        ))
    }
}

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(matches!(
            verify_password("incorrect horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_garbage_hash_rejected() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }
}
