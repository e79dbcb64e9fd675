use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::AppError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    // admin id
    pub sub: String,
    // expiry (unix timestamp seconds)
    pub exp: i64,
    pub iat: i64,
}

/// Checks the submitted pair against the single configured admin identity.
pub fn check_credentials(state: &AppState, username: &str, password: &str) -> Result<(), AppError> {
    let s = &state.settings;

    // an unset password must never match an empty submission
    if s.admin_password.is_empty() || username != s.admin_username || password != s.admin_password {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    Ok(())
}

pub fn make_jwt(state: &AppState) -> Result<String, AppError> {
    let now = Utc::now();
    let exp = now + Duration::minutes(state.settings.token_ttl_minutes);

    let claims = Claims {
        sub: state.settings.admin_id.clone(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Unauthorized(format!("Could not issue token: {e}")))
}

/// Validates signature, expiry, payload and the logout blacklist.
pub fn verify_jwt(state: &AppState, token: &str) -> Result<Claims, AppError> {
    if state.blacklist.is_revoked(token) {
        return Err(AppError::Unauthorized("Token is invalidated".to_string()));
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.settings.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;

    if data.claims.sub.trim().is_empty() {
        return Err(AppError::Unauthorized("Invalid token payload.".to_string()));
    }

    Ok(data.claims)
}

/// Blacklists `token` until it would have expired on its own.
pub fn revoke(state: &AppState, token: &str, expires_at: i64) {
    state.blacklist.revoke(token, expires_at);
}
