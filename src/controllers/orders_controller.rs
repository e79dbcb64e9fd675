use std::collections::HashSet;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AppState,
    error::AppError,
    models::{Order, PageRequest},
    services::print_state::{OrdersView, PrintOutcome, PrintRun},
};

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl PageQuery {
    fn request(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref(), self.per_page.as_deref())
    }
}

// GET /api/orders
pub async fn get_orders(
    State(state): State<AppState>,
    Query(q): Query<PageQuery>,
) -> Result<Response, AppError> {
    let page = state.aggregator().fetch_page(q.request()).await?;
    Ok(Json(page).into_response())
}

// GET /api/orders/all
pub async fn get_all_orders(State(state): State<AppState>) -> Result<Response, AppError> {
    let all = state.aggregator().fetch_all().await?;
    Ok(Json(all).into_response())
}

// GET /api/orders/count
pub async fn get_orders_count(State(state): State<AppState>) -> Result<Response, AppError> {
    let total = state.aggregator().count_actionable().await?;
    Ok(Json(json!({ "totalOrders": total })).into_response())
}

// GET /api/orders/:order_id/notes
pub async fn get_order_notes(
    State(state): State<AppState>,
    Path(order_id): Path<u64>,
) -> Result<Response, AppError> {
    let notes = state.source.order_notes(order_id).await.map_err(|e| match e {
        AppError::NotFound(_) => AppError::NotFound("Order not found or has no notes".to_string()),
        e => e,
    })?;

    Ok(Json(notes).into_response())
}

#[derive(Deserialize)]
pub struct NoteRequest {
    #[serde(default)]
    pub note: String,
}

// POST /api/orders/:order_id/notes
pub async fn post_order_note(
    State(state): State<AppState>,
    Path(order_id): Path<u64>,
    Json(body): Json<NoteRequest>,
) -> Result<Response, AppError> {
    if body.note.trim().is_empty() {
        return Err(AppError::Validation("Note content is required".to_string()));
    }

    let created = state
        .source
        .create_note(order_id, &body.note)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => {
                AppError::NotFound("Order not found or unable to post note".to_string())
            }
            e => e,
        })?;

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    #[serde(default)]
    pub new_status: String,
}

// PUT /api/orders/:order_id
pub async fn put_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<u64>,
    Query(q): Query<PageQuery>,
    Json(body): Json<StatusRequest>,
) -> Result<Response, AppError> {
    // reject before touching the upstream
    if body.new_status.trim().is_empty() {
        return Err(AppError::Validation("Status is required.".to_string()));
    }

    let view = OrdersView::from(state.aggregator().fetch_page(q.request()).await?);
    let view = state
        .coordinator()
        .complete_order(&view, order_id, &body.new_status)
        .await?;

    Ok(Json(json!({
        "message": "Order completed",
        "view": view,
    }))
    .into_response())
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PrintScope {
    #[default]
    Selected,
    Unprinted,
    All,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintRequest {
    #[serde(default)]
    pub scope: PrintScope,
    #[serde(default)]
    pub order_ids: Vec<u64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Serialize)]
struct PrintResponse<'a> {
    message: String,
    /// Selected ids that were not on the requested page.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<u64>,
    #[serde(flatten)]
    run: &'a PrintRun,
}

// POST /api/orders/print
pub async fn post_print(
    State(state): State<AppState>,
    Json(body): Json<PrintRequest>,
) -> Result<Response, AppError> {
    // 0 falls back to the default window
    let req = PageRequest::new(body.page.unwrap_or(0), body.per_page.unwrap_or(0));
    let view = OrdersView::from(state.aggregator().fetch_page(req).await?);

    let mut skipped = Vec::new();
    let batch: Vec<Order> = match body.scope {
        PrintScope::All => state.aggregator().fetch_all().await?.orders,
        PrintScope::Unprinted => view.orders.iter().filter(|o| !o.is_printed).cloned().collect(),
        PrintScope::Selected => {
            let wanted: HashSet<u64> = body.order_ids.iter().copied().collect();
            let batch: Vec<Order> = view.orders.iter().filter(|o| wanted.contains(&o.id)).cloned().collect();

            skipped = body
                .order_ids
                .iter()
                .copied()
                .filter(|id| view.get(*id).is_none())
                .collect();
            if batch.is_empty() && !skipped.is_empty() {
                return Err(AppError::Validation(format!(
                    "None of the selected orders are on page {}: {skipped:?}",
                    view.current_page
                )));
            }
            batch
        }
    };

    match state.coordinator().mark_printed(&view, batch, body.confirm).await? {
        PrintOutcome::NeedsConfirmation { already_printed } => Ok((
            StatusCode::CONFLICT,
            Json(json!({
                "message": "Some orders were already printed. Confirm to print them again.",
                "alreadyPrinted": already_printed,
            })),
        )
            .into_response()),
        PrintOutcome::Printed(run) => {
            let message = if run.failed.is_empty() {
                format!("Printed {} orders", run.printed.len())
            } else {
                format!(
                    "Printed {} orders; {} could not be marked as printed",
                    run.printed.len(),
                    run.failed.len()
                )
            };

            if !skipped.is_empty() {
                tracing::info!(?skipped, "selected orders not on the page were skipped");
            }

            Ok(Json(PrintResponse {
                message,
                skipped,
                run: &run,
            })
            .into_response())
        }
    }
}
