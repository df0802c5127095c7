//! Registration and login handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::services::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub is_admin: bool,
}

/// `POST /auth/register`
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let service = AuthService::new(state.pool(), &state.config().jwt_secret);

    let token = service
        .register(
            &payload.username,
            &payload.email,
            &payload.phone,
            &payload.password,
        )
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// `POST /auth/login`
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let service = AuthService::new(state.pool(), &state.config().jwt_secret);

    let (token, customer) = service.login(&payload.email, &payload.password).await?;

    Ok(Json(LoginResponse {
        token,
        username: customer.username,
        email: customer.email.to_string(),
        phone: customer.phone,
        is_admin: customer.is_admin,
    }))
}
