use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, auth::CurrentSession, error::AppError, services::auth_service};

// ---------------- LOGIN ----------------

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn post_login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let username = body.username.trim();

    if username.is_empty() || body.password.is_empty() {
        return Err(AppError::Validation("Username and password are required.".to_string()));
    }

    if let Err(e) = auth_service::check_credentials(&state, username, &body.password) {
        tracing::warn!(username, "rejected login");
        return Err(e);
    }

    let token = auth_service::make_jwt(&state)?;
    tracing::info!(username, "admin logged in");

    Ok((StatusCode::OK, Json(json!({ "token": token }))).into_response())
}

// ---------------- LOGOUT ----------------

pub async fn post_logout(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> impl IntoResponse {
    auth_service::revoke(&state, &session.token, session.expires_at);
    tracing::info!(admin_id = %session.admin_id, "admin logged out");

    Json(json!({ "message": "Logged out successfully" }))
}
