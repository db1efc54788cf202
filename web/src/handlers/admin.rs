//! Admin login.

use crate::error::AppError;
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/admin/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Admin password
    #[serde(default)]
    pub password: String,
}

/// Issued token.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Admin token for later requests
    pub token: String,
}

/// Exchange the admin password for a token.
///
/// # Errors
///
/// - 400 if the password is missing
/// - 401 if it is wrong
#[allow(clippy::unused_async)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    let Json(request) = body?;
    let token = state.login.login(&request.password)?;
    Ok(ApiResponse::ok(LoginResponse { token }).with_message("Login successful"))
}
