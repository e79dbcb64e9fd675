use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::AppError,
    models::{OrderNote, UpstreamPage},
};

/// The upstream store the dashboard proxies. Production code talks to
/// WooCommerce through [`super::woocommerce::WooCommerceClient`]; tests plug
/// in an in-memory fake.
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Actionable orders, newest first.
    async fn list_orders(&self, page: u32, per_page: u32) -> Result<UpstreamPage, AppError>;

    async fn order_notes(&self, order_id: u64) -> Result<Vec<OrderNote>, AppError>;

    async fn create_note(&self, order_id: u64, note: &str) -> Result<OrderNote, AppError>;

    async fn update_status(&self, order_id: u64, status: &str) -> Result<(), AppError>;

    async fn product(&self, product_id: u64) -> Result<Value, AppError>;
}
