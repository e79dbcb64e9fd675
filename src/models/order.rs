use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized snapshot of an upstream order, annotated with the derived
/// printed flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub status: String,
    pub currency: String,

    pub date_created: String,
    pub date_modified: String,
    pub date_completed: Option<String>,
    pub date_paid: Option<String>,

    // money stays a decimal string end to end
    pub total: String,
    pub payment_method: String,
    pub payment_method_title: String,
    pub customer_note: String,

    pub billing: Address,
    pub shipping: Address,

    pub line_items: Vec<LineItem>,
    pub shipping_lines: Vec<ShippingLine>,
    pub shipping_total: String,

    pub tax_lines: Vec<Value>,
    pub fee_lines: Vec<Value>,
    pub coupon_lines: Vec<Value>,
    pub refunds: Vec<Value>,

    pub meta_data: Vec<MetaData>,

    #[serde(rename = "isPrinted")]
    pub is_printed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub address_1: String,
    pub address_2: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub country: String,

    // billing only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: u64,
    pub name: String,
    pub product_id: u64,
    pub variation_id: u64,
    pub quantity: u32,
    pub tax_class: String,
    pub subtotal: String,
    pub subtotal_tax: String,
    pub total: String,
    pub total_tax: String,
    pub taxes: Vec<Value>,
    pub meta_data: Vec<Value>,
    pub sku: String,
    pub price: String,
    pub image: Option<ItemImage>,
    /// Name of the parent product when the line is a variation.
    pub parent_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemImage {
    #[serde(default)]
    pub id: Value,
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingLine {
    pub id: u64,
    pub method_title: String,
    pub method_id: String,
    pub instance_id: String,
    pub total: String,
    pub total_tax: String,
    pub taxes: Vec<Value>,
    pub meta_data: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub key: String,
    #[serde(default)]
    pub value: Value,
}
