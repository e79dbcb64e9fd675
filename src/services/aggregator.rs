//! Order aggregation: paginates the upstream listing, normalizes every order
//! and derives its `isPrinted` flag.
//!
//! An order counts as printed when either
//! - its metadata carries a `_created_document` entry whose array value
//!   includes `"invoice"`, or
//! - one of its notes contains [`PRINT_MARKER`].
//!
//! The note check costs one upstream call per order. Those calls run
//! concurrently, and a failed lookup only degrades that order to the
//! metadata check.

use std::sync::Arc;

use chrono::Utc;
use futures_util::future::{join_all, try_join_all};
use serde_json::Value;

use crate::{
    error::AppError,
    models::{
        Address, AllOrders, ItemImage, LineItem, MetaData, Order, OrderCounts, OrderNote,
        OrdersPage, PageRequest, ShippingLine,
        upstream::{UpstreamAddress, UpstreamLineItem, UpstreamOrder, UpstreamShippingLine},
    },
};

use super::order_source::OrderSource;

/// Substring that identifies a note written by this system after printing.
pub const PRINT_MARKER: &str = "Order was printed by PrintSync.";

const CREATED_DOCUMENT_KEY: &str = "_created_document";
const INVOICE_TAG: &str = "invoice";
const UNKNOWN: &str = "Unknown";

/// Upper bound on the pages `fetch_all` will request. Anything above this is
/// treated as a broken `x-wp-totalpages` header.
pub const MAX_ALL_PAGES: u32 = 1_000;

pub fn printed_by_metadata(meta: &[MetaData]) -> bool {
    meta.iter().any(|m| {
        m.key == CREATED_DOCUMENT_KEY
            && m
                .value
                .as_array()
                .is_some_and(|docs| docs.iter().any(|d| d.as_str() == Some(INVOICE_TAG)))
    })
}

pub fn printed_by_notes(notes: &[OrderNote]) -> bool {
    notes.iter().any(|n| n.contains(PRINT_MARKER))
}

#[derive(Clone)]
pub struct OrderAggregator {
    source: Arc<dyn OrderSource>,
}

impl OrderAggregator {
    pub fn new(source: Arc<dyn OrderSource>) -> Self {
        Self { source }
    }

    pub async fn fetch_page(&self, req: PageRequest) -> Result<OrdersPage, AppError> {
        let upstream = self.source.list_orders(req.page, req.per_page).await?;

        let orders: Vec<Order> =
            join_all(upstream.orders.into_iter().map(|raw| self.annotate(raw))).await;

        // server counts are authoritative; the fallback is only an approximation
        let total_orders = upstream.total_orders.unwrap_or(orders.len() as u64);
        let total_pages = upstream.total_pages.unwrap_or(1);

        tracing::debug!(
            page = req.page,
            per_page = req.per_page,
            received = orders.len(),
            total_orders,
            total_pages,
            "fetched orders page"
        );

        Ok(OrdersPage {
            actual_orders_count: orders.len(),
            orders,
            total_orders,
            total_pages,
            current_page: req.page,
            per_page: req.per_page,
        })
    }

    /// Every actionable order across all pages, page 1 first.
    ///
    /// Pages after the first are requested concurrently; the first failure
    /// aborts the whole call.
    pub async fn fetch_all(&self) -> Result<AllOrders, AppError> {
        let first = self.fetch_page(PageRequest::default()).await?;
        let per_page = first.per_page;
        let total_pages = first.total_pages;

        if total_pages > MAX_ALL_PAGES {
            tracing::warn!(total_pages, max = MAX_ALL_PAGES, "upstream reported an implausible page count");
            return Err(AppError::MalformedUpstream(format!(
                "implausible page count {total_pages}"
            )));
        }

        let rest = try_join_all(
            (2..=total_pages).map(|page| self.fetch_page(PageRequest::new(page, per_page))),
        )
        .await?;

        let mut orders = first.orders;
        for page in rest {
            orders.extend(page.orders);
        }

        let counts = OrderCounts::tally(&orders);
        tracing::info!(
            total = orders.len(),
            printed = counts.printed,
            unprinted = counts.unprinted,
            pages = total_pages,
            "fetched all orders"
        );

        Ok(AllOrders { orders, counts })
    }

    /// Current number of actionable orders, without any note lookups.
    pub async fn count_actionable(&self) -> Result<u64, AppError> {
        let upstream = self.source.list_orders(1, 1).await?;
        Ok(upstream
            .total_orders
            .unwrap_or(upstream.orders.len() as u64))
    }

    async fn annotate(&self, raw: UpstreamOrder) -> Order {
        let meta = raw.meta_data.clone().unwrap_or_default();

        let is_printed = if printed_by_metadata(&meta) {
            true
        } else {
            match self.source.order_notes(raw.id).await {
                Ok(notes) => printed_by_notes(&notes),
                Err(e) => {
                    tracing::warn!(order_id = raw.id, error = %e, "failed to fetch order notes; using metadata only");
                    false
                }
            }
        };

        normalize(raw, is_printed)
    }
}

pub fn normalize(raw: UpstreamOrder, is_printed: bool) -> Order {
    let now = Utc::now().to_rfc3339();

    Order {
        id: raw.id,
        status: raw.status.unwrap_or_default(),
        currency: raw.currency.unwrap_or_default(),
        date_created: non_empty(raw.date_created).unwrap_or_else(|| now.clone()),
        date_modified: non_empty(raw.date_modified).unwrap_or(now),
        date_completed: non_empty(raw.date_completed),
        date_paid: non_empty(raw.date_paid),
        total: raw.total.unwrap_or_default(),
        payment_method: raw.payment_method.unwrap_or_default(),
        payment_method_title: raw.payment_method_title.unwrap_or_default(),
        customer_note: raw.customer_note.unwrap_or_default(),
        billing: normalize_address(raw.billing.unwrap_or_default(), true),
        shipping: normalize_address(raw.shipping.unwrap_or_default(), false),
        line_items: raw
            .line_items
            .unwrap_or_default()
            .into_iter()
            .map(normalize_line_item)
            .collect(),
        shipping_lines: raw
            .shipping_lines
            .unwrap_or_default()
            .into_iter()
            .map(normalize_shipping_line)
            .collect(),
        shipping_total: non_empty(raw.shipping_total).unwrap_or_else(|| "0.00".to_string()),
        tax_lines: raw.tax_lines.unwrap_or_default(),
        fee_lines: raw.fee_lines.unwrap_or_default(),
        coupon_lines: raw.coupon_lines.unwrap_or_default(),
        refunds: raw.refunds.unwrap_or_default(),
        meta_data: raw.meta_data.unwrap_or_default(),
        is_printed,
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

fn or_empty(v: Option<String>) -> String {
    v.unwrap_or_default()
}

fn normalize_address(a: UpstreamAddress, with_email: bool) -> Address {
    Address {
        first_name: non_empty(a.first_name).unwrap_or_else(|| UNKNOWN.to_string()),
        last_name: non_empty(a.last_name).unwrap_or_else(|| UNKNOWN.to_string()),
        company: or_empty(a.company),
        address_1: or_empty(a.address_1),
        address_2: or_empty(a.address_2),
        city: or_empty(a.city),
        state: or_empty(a.state),
        postcode: or_empty(a.postcode),
        country: or_empty(a.country),
        email: with_email.then(|| or_empty(a.email)),
        phone: or_empty(a.phone),
    }
}

fn normalize_line_item(item: UpstreamLineItem) -> LineItem {
    LineItem {
        id: item.id,
        name: or_empty(item.name),
        product_id: item.product_id,
        variation_id: item.variation_id,
        quantity: u32::try_from(item.quantity).unwrap_or(0),
        tax_class: or_empty(item.tax_class),
        subtotal: or_empty(item.subtotal),
        subtotal_tax: or_empty(item.subtotal_tax),
        total: or_empty(item.total),
        total_tax: or_empty(item.total_tax),
        taxes: item.taxes.unwrap_or_default(),
        meta_data: item.meta_data.unwrap_or_default(),
        sku: or_empty(item.sku),
        price: money_string(&item.price),
        image: item.image.and_then(|img| {
            non_empty(img.src).map(|src| ItemImage { id: img.id, src })
        }),
        parent_name: non_empty(item.parent_name),
    }
}

fn normalize_shipping_line(line: UpstreamShippingLine) -> ShippingLine {
    ShippingLine {
        id: line.id,
        method_title: or_empty(line.method_title),
        method_id: or_empty(line.method_id),
        instance_id: or_empty(line.instance_id),
        total: or_empty(line.total),
        total_tax: or_empty(line.total_tax),
        taxes: line.taxes.unwrap_or_default(),
        meta_data: line.meta_data.unwrap_or_default(),
    }
}

fn money_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}
