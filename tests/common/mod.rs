#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use http_body_util::BodyExt;
use printsync::{
    AppState,
    config::Settings,
    error::AppError,
    models::{Order, OrderNote, UpstreamPage, upstream::UpstreamOrder},
    render::{PrintRenderer, PrintSheet},
    services::order_source::OrderSource,
    templates,
};
use serde_json::{Value, json};

pub const PASSWORD: &str = "s3cret-pass";

pub fn test_settings() -> Settings {
    Settings {
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: "test-secret".to_string(),
        token_ttl_minutes: 480,
        admin_id: "admin-1".to_string(),
        admin_username: "admin".to_string(),
        admin_password: PASSWORD.to_string(),
        wc_base_url: "http://upstream.invalid".to_string(),
        wc_consumer_key: String::new(),
        wc_consumer_secret: String::new(),
        static_dir: "public".to_string(),
    }
}

pub fn raw_order(id: u64) -> Value {
    json!({
        "id": id,
        "status": "processing",
        "currency": "ILS",
        "date_created": "2024-03-01T10:00:00",
        "total": "120.00",
        "payment_method_title": "Credit card",
        "billing": { "first_name": "Dana", "last_name": "Levi", "city": "Haifa", "email": "dana@example.com" },
        "shipping": {},
        "line_items": [
            { "id": id * 10, "name": "Olive oil", "product_id": 7, "quantity": 2, "total": "80.00", "price": 40 }
        ],
        "shipping_lines": [
            { "id": 1, "method_title": "Courier", "method_id": "flat_rate", "total": "40.00" }
        ],
        "meta_data": []
    })
}

pub fn order(id: u64) -> UpstreamOrder {
    serde_json::from_value(raw_order(id)).expect("valid upstream order")
}

/// An order whose metadata says an invoice document was already created.
pub fn invoice_order(id: u64) -> UpstreamOrder {
    let mut raw = raw_order(id);
    raw["meta_data"] = json!([{ "id": 1, "key": "_created_document", "value": ["invoice"] }]);
    serde_json::from_value(raw).expect("valid upstream order")
}

pub fn note(text: &str) -> OrderNote {
    OrderNote {
        id: 1,
        note: text.to_string(),
        ..OrderNote::default()
    }
}

/// In-memory upstream. Pages are pre-chunked; `per_page` is ignored.
#[derive(Default)]
pub struct FakeSource {
    pub pages: Mutex<Vec<Vec<UpstreamOrder>>>,
    pub report_totals: bool,
    pub notes: Mutex<HashMap<u64, Vec<OrderNote>>>,
    pub failing_notes: HashSet<u64>,
    pub failing_posts: HashSet<u64>,
    pub failing_pages: HashSet<u32>,
    pub page_delays_ms: HashMap<u32, u64>,
    pub note_delays_ms: HashMap<u64, u64>,
    pub products: HashMap<u64, Value>,
    /// Reported instead of the real page count.
    pub total_pages_override: Option<u32>,
    /// Fails the single-row listing used for counting.
    pub failing_count: bool,

    pub list_calls: Mutex<Vec<(u32, u32)>>,
    pub note_lookups: Mutex<Vec<u64>>,
    pub posted: Mutex<Vec<(u64, String)>>,
    pub status_updates: Mutex<Vec<(u64, String)>>,
    pub events: Arc<Mutex<Vec<String>>>,
    pub pages_in_flight: InFlight,
    pub notes_in_flight: InFlight,
}

/// Tracks how many calls overlap.
#[derive(Default)]
pub struct InFlight {
    current: AtomicUsize,
    max: AtomicUsize,
}

impl InFlight {
    fn enter(&self) -> InFlightGuard<'_> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.max.fetch_max(now, Ordering::SeqCst);
        InFlightGuard(self)
    }

    pub fn max(&self) -> usize {
        self.max.load(Ordering::SeqCst)
    }
}

struct InFlightGuard<'a>(&'a InFlight);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.current.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FakeSource {
    pub fn new(pages: Vec<Vec<UpstreamOrder>>) -> Self {
        Self {
            pages: Mutex::new(pages),
            report_totals: true,
            ..Self::default()
        }
    }

    pub fn add_note(&self, order_id: u64, text: &str) {
        self.notes
            .lock()
            .unwrap()
            .entry(order_id)
            .or_default()
            .push(note(text));
    }

    pub fn posted(&self) -> Vec<(u64, String)> {
        self.posted.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderSource for FakeSource {
    async fn list_orders(&self, page: u32, per_page: u32) -> Result<UpstreamPage, AppError> {
        self.list_calls.lock().unwrap().push((page, per_page));
        let _guard = self.pages_in_flight.enter();

        if let Some(ms) = self.page_delays_ms.get(&page) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        if self.failing_count && per_page == 1 {
            return Err(AppError::UpstreamUnavailable("count timed out".to_string()));
        }
        if self.failing_pages.contains(&page) {
            return Err(AppError::UpstreamUnavailable(format!("page {page} timed out")));
        }

        let pages = self.pages.lock().unwrap().clone();
        let total: usize = pages.iter().map(Vec::len).sum();
        let orders = pages
            .get(page.saturating_sub(1) as usize)
            .cloned()
            .unwrap_or_default();

        Ok(UpstreamPage {
            orders,
            total_orders: self.report_totals.then_some(total as u64),
            total_pages: self
                .report_totals
                .then(|| self.total_pages_override.unwrap_or(pages.len().max(1) as u32)),
        })
    }

    async fn order_notes(&self, order_id: u64) -> Result<Vec<OrderNote>, AppError> {
        self.note_lookups.lock().unwrap().push(order_id);
        let _guard = self.notes_in_flight.enter();

        if let Some(ms) = self.note_delays_ms.get(&order_id) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        if self.failing_notes.contains(&order_id) {
            return Err(AppError::UpstreamUnavailable("notes unavailable".to_string()));
        }
        Ok(self
            .notes
            .lock()
            .unwrap()
            .get(&order_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_note(&self, order_id: u64, text: &str) -> Result<OrderNote, AppError> {
        self.events.lock().unwrap().push(format!("post:{order_id}"));
        if self.failing_posts.contains(&order_id) {
            return Err(AppError::UpstreamStatus {
                status: 500,
                body: "boom".to_string(),
            });
        }
        self.posted.lock().unwrap().push((order_id, text.to_string()));
        self.add_note(order_id, text);
        Ok(note(text))
    }

    async fn update_status(&self, order_id: u64, status: &str) -> Result<(), AppError> {
        self.status_updates
            .lock()
            .unwrap()
            .push((order_id, status.to_string()));

        if status != "processing" {
            for page in self.pages.lock().unwrap().iter_mut() {
                page.retain(|o| o.id != order_id);
            }
        }
        Ok(())
    }

    async fn product(&self, product_id: u64) -> Result<Value, AppError> {
        self.products
            .get(&product_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("product: not found".to_string()))
    }
}

/// Renderer that only records when it was called.
pub struct RecordingRenderer {
    pub events: Arc<Mutex<Vec<String>>>,
}

impl PrintRenderer for RecordingRenderer {
    fn render(&self, orders: &[Order]) -> Result<String, AppError> {
        self.events
            .lock()
            .unwrap()
            .push(format!("render:{}", orders.len()));
        Ok(format!("<html>{} orders</html>", orders.len()))
    }
}

pub fn print_sheet() -> Arc<PrintSheet> {
    Arc::new(PrintSheet::new(templates::build_handlebars().expect("templates")))
}

pub fn test_state(source: Arc<FakeSource>) -> AppState {
    AppState::new(test_settings(), source, print_sheet())
}

pub async fn response_json(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}
