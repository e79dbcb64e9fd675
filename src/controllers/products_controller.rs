use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::AppError};

#[derive(Deserialize)]
pub struct ProductQuery {
    pub fields: Option<String>,
}

// GET /api/products/:product_id
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<u64>,
    Query(q): Query<ProductQuery>,
) -> Result<Response, AppError> {
    let product = state.source.product(product_id).await.map_err(|e| match e {
        AppError::NotFound(_) => AppError::NotFound("Product not found".to_string()),
        e => e,
    })?;

    if q.fields.as_deref() == Some("description") {
        let description = product.get("description").cloned().unwrap_or_default();
        return Ok(Json(json!({ "description": description })).into_response());
    }

    Ok(Json(product).into_response())
}
