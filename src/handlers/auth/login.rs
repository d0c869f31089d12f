// handlers/auth/login.rs - POST /api/auth/login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::{generate_jwt, Claims};
use crate::error::{ApiError, ApiResult};
use crate::services::{AccountError, AccountService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /api/auth/login - Exchange admin credentials for a bearer token
///
/// Expected Input:
/// ```json
/// { "email": "admin@example.com", "password": "..." }
/// ```
///
/// Expected Output:
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiI..." }
/// ```
///
/// 400 when either field is missing, 401 on unknown email or wrong password.
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(payload) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;

    let (Some(email), Some(password)) = (
        payload.email.filter(|e| !e.trim().is_empty()),
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::validation_error(
            "Please provide email and password",
            None,
        ));
    };

    let accounts = AccountService::new(state.repos.users.clone());
    let user = accounts.authenticate(&email, &password).await.map_err(|e| {
        if matches!(e, AccountError::InvalidCredentials) {
            tracing::info!("Failed login attempt for {}", email.trim());
        }
        ApiError::from(e)
    })?;

    let claims = Claims::for_user(&user, &state.config.security);
    let token = generate_jwt(&claims, &state.config.security.jwt_secret).map_err(|e| {
        tracing::error!("Token generation failed: {}", e);
        ApiError::internal_server_error("Something went wrong!")
    })?;

    tracing::info!("User {} logged in", user.email);
    Ok(Json(LoginResponse { token }))
}
