use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, header::HeaderMap};
use serde_json::{Value, json};

use crate::{
    error::AppError,
    models::{OrderNote, UpstreamPage, upstream::UpstreamOrder},
};

use super::order_source::OrderSource;

/// Only orders in this status are listed on the dashboard.
pub const ACTIONABLE_STATUS: &str = "processing";

const TOTAL_HEADER: &str = "x-wp-total";
const TOTAL_PAGES_HEADER: &str = "x-wp-totalpages";

#[derive(Clone)]
pub struct WooCommerceClient {
    http: Client,
    base_url: String,
    consumer_key: String,
    consumer_secret: String,
}

impl WooCommerceClient {
    pub fn new(base_url: String, consumer_key: String, consumer_secret: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            consumer_key,
            consumer_secret,
        }
    }

    fn has_credentials(&self) -> bool {
        !self.consumer_key.trim().is_empty() && !self.consumer_secret.trim().is_empty()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, req: RequestBuilder, what: &str) -> Result<Response, AppError> {
        if !self.has_credentials() {
            return Err(AppError::UpstreamUnavailable(
                "WC_CONSUMER_KEY / WC_CONSUMER_SECRET are missing in .env".to_string(),
            ));
        }

        let res = req
            .basic_auth(&self.consumer_key, Some(&self.consumer_secret))
            .send()
            .await?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("{what}: not found")));
        }
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            tracing::error!(%status, what, "upstream request failed");
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(res)
    }
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<T>().ok())
}

#[async_trait]
impl OrderSource for WooCommerceClient {
    async fn list_orders(&self, page: u32, per_page: u32) -> Result<UpstreamPage, AppError> {
        let req = self.http.get(self.url("/orders")).query(&[
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
            ("orderby", "date".to_string()),
            ("order", "desc".to_string()),
            ("status", ACTIONABLE_STATUS.to_string()),
        ]);
        let res = self.send(req, "orders").await?;

        let total_orders = header_number::<u64>(res.headers(), TOTAL_HEADER);
        let total_pages = header_number::<u32>(res.headers(), TOTAL_PAGES_HEADER);

        let body: Value = res.json().await?;
        let Value::Array(items) = body else {
            return Err(AppError::MalformedUpstream(format!(
                "expected an array of orders, got {}",
                json_kind(&body)
            )));
        };

        let orders = items
            .into_iter()
            .map(serde_json::from_value::<UpstreamOrder>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::MalformedUpstream(e.to_string()))?;

        Ok(UpstreamPage {
            orders,
            total_orders,
            total_pages,
        })
    }

    async fn order_notes(&self, order_id: u64) -> Result<Vec<OrderNote>, AppError> {
        let req = self.http.get(self.url(&format!("/orders/{order_id}/notes")));
        let res = self.send(req, "order notes").await?;
        res.json::<Vec<OrderNote>>()
            .await
            .map_err(|e| AppError::MalformedUpstream(e.to_string()))
    }

    async fn create_note(&self, order_id: u64, note: &str) -> Result<OrderNote, AppError> {
        let req = self
            .http
            .post(self.url(&format!("/orders/{order_id}/notes")))
            .json(&json!({ "note": note }));
        let res = self.send(req, "order note").await?;
        res.json::<OrderNote>()
            .await
            .map_err(|e| AppError::MalformedUpstream(e.to_string()))
    }

    async fn update_status(&self, order_id: u64, status: &str) -> Result<(), AppError> {
        let req = self
            .http
            .put(self.url(&format!("/orders/{order_id}")))
            .json(&json!({ "status": status }));
        self.send(req, "order").await?;
        Ok(())
    }

    async fn product(&self, product_id: u64) -> Result<Value, AppError> {
        let req = self.http.get(self.url(&format!("/products/{product_id}")));
        let res = self.send(req, "product").await?;
        let product: Value = res.json().await?;
        if product.is_null() {
            return Err(AppError::NotFound("Product not found".to_string()));
        }
        Ok(product)
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
