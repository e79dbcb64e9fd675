use axum::{
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{AppState, error::AppError, services::auth_service};

/// Attached to authenticated requests.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub admin_id: String,
    pub token: String,
    pub expires_at: i64,
}

fn is_public_path(path: &str) -> bool {
    // everything outside /api is the UI bundle
    path == "/api/auth/login" || !path.starts_with("/api/")
}

pub async fn require_auth(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    if is_public_path(req.uri().path()) {
        return next.run(req).await;
    }

    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return AppError::Unauthorized("Access denied".to_string()).into_response();
    };
    let token = bearer.token().to_string();

    match auth_service::verify_jwt(&state, &token) {
        Ok(claims) => {
            req.extensions_mut().insert(CurrentSession {
                admin_id: claims.sub,
                token,
                expires_at: claims.exp,
            });
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(error = %e, path = req.uri().path(), "rejected request");
            e.into_response()
        }
    }
}
