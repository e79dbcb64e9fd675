use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Upstream request failed: {status} {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Malformed upstream response: {0}")]
    MalformedUpstream(String),

    #[error("Template error: {0}")]
    Render(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UpstreamUnavailable(_) | AppError::MalformedUpstream(_) => StatusCode::BAD_GATEWAY,
            // upstream 401/403 means our consumer credentials are wrong, not the caller's token
            AppError::UpstreamStatus { status, .. } => match StatusCode::from_u16(*status) {
                Ok(s) if s.is_client_error() && s != StatusCode::UNAUTHORIZED && s != StatusCode::FORBIDDEN => s,
                _ => StatusCode::BAD_GATEWAY,
            },
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AppError::MalformedUpstream(e.to_string())
        } else {
            AppError::UpstreamUnavailable(e.to_string())
        }
    }
}

impl From<handlebars::RenderError> for AppError {
    fn from(e: handlebars::RenderError) -> Self {
        AppError::Render(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
