//! Print and completion actions over a page of orders.
//!
//! A page is held as an [`OrdersView`]. Views are never edited in place:
//! marking orders printed first yields an `Optimistic` view (the flag flipped
//! locally), and once the marker notes have been posted the page is fetched
//! again and the result replaces it as a `Reconciled` view. The last fetch
//! wins.

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;

use crate::{
    error::AppError,
    models::{Order, OrdersPage, PageRequest},
    render::PrintRenderer,
};

use super::{
    aggregator::OrderAggregator,
    item_summary::{ItemSummary, summarize_items},
    order_source::OrderSource,
    woocommerce::ACTIONABLE_STATUS,
};

/// Note posted upstream after an order has been printed. Contains
/// [`super::aggregator::PRINT_MARKER`].
pub const PRINT_NOTE: &str = "Order was printed by PrintSync. ההזמנה הודפסה על ידי מערכת PrintSync";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewPhase {
    /// Local projection not yet confirmed by a fetch.
    Optimistic,
    /// Straight from the upstream.
    Reconciled,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersView {
    pub orders: Vec<Order>,
    pub total_orders: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub per_page: u32,
    pub phase: ViewPhase,
}

impl From<OrdersPage> for OrdersView {
    fn from(page: OrdersPage) -> Self {
        Self {
            orders: page.orders,
            total_orders: page.total_orders,
            total_pages: page.total_pages,
            current_page: page.current_page,
            per_page: page.per_page,
            phase: ViewPhase::Reconciled,
        }
    }
}

impl OrdersView {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.current_page, self.per_page)
    }

    pub fn get(&self, order_id: u64) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == order_id)
    }

    /// Copy of this view with the printed flag of `ids` set to `printed`.
    fn with_printed(&self, ids: &HashSet<u64>, printed: bool) -> Self {
        let orders = self
            .orders
            .iter()
            .map(|o| {
                if ids.contains(&o.id) {
                    Order {
                        is_printed: printed,
                        ..o.clone()
                    }
                } else {
                    o.clone()
                }
            })
            .collect();

        Self {
            orders,
            phase: ViewPhase::Optimistic,
            ..self.clone()
        }
    }

    fn set_total(&mut self, total_orders: u64) {
        self.total_orders = total_orders;
        let pages = total_orders.div_ceil(u64::from(self.per_page.max(1))).max(1);
        self.total_pages = u32::try_from(pages).unwrap_or(u32::MAX);
    }

    /// Copy of this view after `order_id` moved to `status`.
    fn with_status(&self, order_id: u64, status: &str) -> Self {
        let mut next = self.clone();
        next.phase = ViewPhase::Optimistic;

        if status == ACTIONABLE_STATUS {
            if let Some(order) = next.orders.iter_mut().find(|o| o.id == order_id) {
                order.status = status.to_string();
            }
            return next;
        }

        let before = next.orders.len();
        next.orders.retain(|o| o.id != order_id);
        if next.orders.len() < before {
            next.total_orders = next.total_orders.saturating_sub(1);
        }
        next
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintRun {
    pub html: String,
    pub summary: Vec<ItemSummary>,
    /// Orders whose marker note was accepted upstream.
    pub printed: Vec<u64>,
    /// Orders whose marker note failed; their local flag was rolled back.
    pub failed: Vec<u64>,
    #[serde(skip)]
    pub optimistic: OrdersView,
    pub view: OrdersView,
}

#[derive(Debug, Clone)]
pub enum PrintOutcome {
    /// Nothing was printed: some orders already carry the printed flag.
    NeedsConfirmation { already_printed: Vec<u64> },
    Printed(PrintRun),
}

#[derive(Clone)]
pub struct PrintCoordinator {
    source: Arc<dyn OrderSource>,
    aggregator: OrderAggregator,
    renderer: Arc<dyn PrintRenderer>,
}

impl PrintCoordinator {
    pub fn new(source: Arc<dyn OrderSource>, renderer: Arc<dyn PrintRenderer>) -> Self {
        Self {
            aggregator: OrderAggregator::new(source.clone()),
            source,
            renderer,
        }
    }

    pub async fn mark_printed(
        &self,
        view: &OrdersView,
        batch: Vec<Order>,
        confirmed: bool,
    ) -> Result<PrintOutcome, AppError> {
        if batch.is_empty() {
            return Err(AppError::Validation("No orders to print".to_string()));
        }

        let already_printed: Vec<u64> = batch.iter().filter(|o| o.is_printed).map(|o| o.id).collect();
        if !already_printed.is_empty() && !confirmed {
            tracing::info!(?already_printed, "re-print requires confirmation");
            return Ok(PrintOutcome::NeedsConfirmation { already_printed });
        }

        // the sheet goes out before any network call
        let html = self.renderer.render(&batch)?;
        let summary = summarize_items(&batch);

        let ids: HashSet<u64> = batch.iter().map(|o| o.id).collect();
        let optimistic = view.with_printed(&ids, true);

        let results = join_all(batch.iter().map(|o| self.source.create_note(o.id, PRINT_NOTE))).await;

        let mut printed = Vec::new();
        let mut failed = Vec::new();
        for (order, result) in batch.iter().zip(results) {
            match result {
                Ok(_) => printed.push(order.id),
                Err(e) => {
                    tracing::warn!(order_id = order.id, error = %e, "failed to post print note");
                    failed.push(order.id);
                }
            }
        }

        // only roll back orders that weren't printed before this run
        let rollback: HashSet<u64> = batch
            .iter()
            .filter(|o| !o.is_printed && failed.contains(&o.id))
            .map(|o| o.id)
            .collect();
        let settled = if rollback.is_empty() {
            optimistic.clone()
        } else {
            optimistic.with_printed(&rollback, false)
        };

        let view = match self.aggregator.fetch_page(view.page_request()).await {
            Ok(page) => OrdersView::from(page),
            Err(e) => {
                tracing::warn!(error = %e, "reconciling fetch failed; keeping local view");
                settled
            }
        };

        tracing::info!(printed = printed.len(), failed = failed.len(), "print run finished");

        Ok(PrintOutcome::Printed(PrintRun {
            html,
            summary,
            printed,
            failed,
            optimistic,
            view,
        }))
    }

    pub async fn complete_order(
        &self,
        view: &OrdersView,
        order_id: u64,
        new_status: &str,
    ) -> Result<OrdersView, AppError> {
        let status = new_status.trim();
        if status.is_empty() {
            return Err(AppError::Validation("Status is required.".to_string()));
        }

        self.source.update_status(order_id, status).await?;
        tracing::info!(order_id, status, "order status updated");

        let mut next = view.with_status(order_id, status);

        // the order may sit on another page, so only the upstream knows the new total
        match self.aggregator.count_actionable().await {
            Ok(total) => next.set_total(total),
            Err(e) => {
                tracing::warn!(error = %e, "count refresh failed; keeping local total");
            }
        }

        Ok(next)
    }
}
