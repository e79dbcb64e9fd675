use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// GET /api/health/upstream
pub async fn health_upstream(State(state): State<AppState>) -> Response {
    match state.aggregator().count_actionable().await {
        Ok(total) => (StatusCode::OK, Json(json!({ "upstream": "ok", "totalOrders": total }))).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "upstream": "error", "message": e.to_string() })),
        )
            .into_response(),
    }
}

pub async fn api_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" })))
}
