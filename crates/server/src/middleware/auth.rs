//! Bearer-token authentication and the admin capability check.
//!
//! Login issues a signed HS256 token whose claims carry the customer
//! profile and the admin role resolved at authentication time. Handlers
//! declare what they need through extractors: [`RequireAuth`] for any
//! signed-in customer, [`RequireAdmin`] for administrative operations.
//! There are no ad hoc role checks inside handlers.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use greengrocer_core::Email;

use crate::state::AppState;

/// Token lifetime.
const TOKEN_TTL_MINUTES: i64 = 60;

/// Claims carried in a bearer token.
///
/// The profile fields are resolved once at login; the order core trusts
/// them for the lifetime of the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Customer email (the customer key used across the API).
    pub sub: String,
    /// Display name.
    pub username: String,
    /// Contact phone.
    pub phone: String,
    /// Admin role, resolved from the customer row at login.
    pub is_admin: bool,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Build claims for a customer profile with the standard TTL.
    #[must_use]
    pub fn new(email: &str, username: &str, phone: &str, is_admin: bool) -> Self {
        let now = Utc::now();
        Self {
            sub: email.to_owned(),
            username: username.to_owned(),
            phone: phone.to_owned(),
            is_admin,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(TOKEN_TTL_MINUTES)).timestamp(),
        }
    }
}

/// Sign a token for the given claims.
///
/// # Errors
///
/// Returns a `jsonwebtoken` error if signing fails.
pub fn issue_token(
    claims: &Claims,
    secret: &SecretString,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
}

/// Verify a token's signature and expiry and return its claims.
///
/// # Errors
///
/// Returns a `jsonwebtoken` error if the token is malformed, expired, or
/// signed with a different secret.
pub fn verify_token(
    token: &str,
    secret: &SecretString,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims)
}

/// The authenticated customer, as established by the bearer token.
#[derive(Debug, Clone)]
pub struct CurrentCustomer {
    pub email: Email,
    pub username: String,
    pub phone: String,
    pub is_admin: bool,
}

/// Rejection for the authentication extractors.
#[derive(Debug)]
pub enum AuthRejection {
    /// No usable `Authorization: Bearer` header.
    MissingToken,
    /// Token malformed, expired, or badly signed.
    InvalidToken,
    /// Valid token, but the operation requires the admin role.
    AdminOnly,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingToken => (StatusCode::UNAUTHORIZED, "authentication required"),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid or expired token"),
            Self::AdminOnly => (StatusCode::FORBIDDEN, "admin access required"),
        };
        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

/// Extractor that requires a signed-in customer.
pub struct RequireAuth(pub CurrentCustomer);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthRejection::MissingToken)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(AuthRejection::MissingToken)?;

        let claims = verify_token(token, &state.config().jwt_secret)
            .map_err(|_| AuthRejection::InvalidToken)?;

        let email = Email::parse(&claims.sub).map_err(|_| AuthRejection::InvalidToken)?;

        Ok(Self(CurrentCustomer {
            email,
            username: claims.username,
            phone: claims.phone,
            is_admin: claims.is_admin,
        }))
    }
}

/// Extractor that requires the admin role.
///
/// Admin-only handlers take this instead of [`RequireAuth`], which keeps
/// the capability requirement visible in the handler signature.
pub struct RequireAdmin(pub CurrentCustomer);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(customer) = RequireAuth::from_request_parts(parts, state).await?;

        if !customer.is_admin {
            return Err(AuthRejection::AdminOnly);
        }

        Ok(Self(customer))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("test-signing-key-0123456789abcdefghij")
    }

    #[test]
    fn test_token_round_trip() {
        let claims = Claims::new("alice@example.com", "alice", "0123456789", false);
        let token = issue_token(&claims, &secret()).unwrap();

        let decoded = verify_token(&token, &secret()).unwrap();
        assert_eq!(decoded.sub, "alice@example.com");
        assert_eq!(decoded.username, "alice");
        assert!(!decoded.is_admin);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = Claims::new("alice@example.com", "alice", "0123456789", false);
        let token = issue_token(&claims, &secret()).unwrap();

        let other = SecretString::from("another-signing-key-9876543210zyxwv");
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: "alice@example.com".to_owned(),
            username: "alice".to_owned(),
            phone: "0123456789".to_owned(),
            is_admin: false,
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = issue_token(&claims, &secret()).unwrap();

        assert!(verify_token(&token, &secret()).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let claims = Claims::new("alice@example.com", "alice", "0123456789", false);
        let mut token = issue_token(&claims, &secret()).unwrap();
        token.push('x');

        assert!(verify_token(&token, &secret()).is_err());
    }
}
