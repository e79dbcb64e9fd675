//! Wire shapes returned by the upstream store.
//!
//! Everything that may be missing upstream is optional here; the aggregator
//! turns these into [`crate::models::Order`] with the documented defaults.

use serde::Deserialize;
use serde_json::Value;

use super::MetaData;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamOrder {
    pub id: u64,

    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub date_modified: Option<String>,
    #[serde(default)]
    pub date_completed: Option<String>,
    #[serde(default)]
    pub date_paid: Option<String>,

    #[serde(default)]
    pub total: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_method_title: Option<String>,
    #[serde(default)]
    pub customer_note: Option<String>,

    #[serde(default)]
    pub billing: Option<UpstreamAddress>,
    #[serde(default)]
    pub shipping: Option<UpstreamAddress>,

    #[serde(default)]
    pub line_items: Option<Vec<UpstreamLineItem>>,
    #[serde(default)]
    pub shipping_lines: Option<Vec<UpstreamShippingLine>>,
    #[serde(default)]
    pub shipping_total: Option<String>,

    #[serde(default)]
    pub tax_lines: Option<Vec<Value>>,
    #[serde(default)]
    pub fee_lines: Option<Vec<Value>>,
    #[serde(default)]
    pub coupon_lines: Option<Vec<Value>>,
    #[serde(default)]
    pub refunds: Option<Vec<Value>>,

    #[serde(default)]
    pub meta_data: Option<Vec<MetaData>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpstreamAddress {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpstreamLineItem {
    pub id: u64,
    pub name: Option<String>,
    pub product_id: u64,
    pub variation_id: u64,
    pub quantity: i64,
    pub tax_class: Option<String>,
    pub subtotal: Option<String>,
    pub subtotal_tax: Option<String>,
    pub total: Option<String>,
    pub total_tax: Option<String>,
    pub taxes: Option<Vec<Value>>,
    pub meta_data: Option<Vec<Value>>,
    pub sku: Option<String>,
    // number in WooCommerce, string in some plugins
    pub price: Value,
    pub image: Option<UpstreamImage>,
    pub parent_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpstreamImage {
    pub id: Value,
    pub src: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpstreamShippingLine {
    pub id: u64,
    pub method_title: Option<String>,
    pub method_id: Option<String>,
    pub instance_id: Option<String>,
    pub total: Option<String>,
    pub total_tax: Option<String>,
    pub taxes: Option<Vec<Value>>,
    pub meta_data: Option<Vec<Value>>,
}

/// One page of the upstream order listing plus whatever totals the
/// upstream reported alongside it.
#[derive(Debug, Clone, Default)]
pub struct UpstreamPage {
    pub orders: Vec<UpstreamOrder>,
    pub total_orders: Option<u64>,
    pub total_pages: Option<u32>,
}
