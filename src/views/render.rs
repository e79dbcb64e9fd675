use std::str::FromStr;

use chrono::DateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Value, json};

use crate::{
    error::AppError,
    models::Order,
    services::item_summary::summarize_items,
};

use crate::templates::{Hbs, PRINT_ORDERS};

const NOT_SPECIFIED: &str = "Not specified";

/// Produces the printable sheet for a batch of orders.
pub trait PrintRenderer: Send + Sync {
    fn render(&self, orders: &[Order]) -> Result<String, AppError>;
}

#[derive(Clone)]
pub struct PrintSheet {
    hbs: Hbs,
}

impl PrintSheet {
    pub fn new(hbs: Hbs) -> Self {
        Self { hbs }
    }
}

impl PrintRenderer for PrintSheet {
    fn render(&self, orders: &[Order]) -> Result<String, AppError> {
        let ctx = json!({
            "orders": orders.iter().map(order_ctx).collect::<Vec<_>>(),
            "summary": summarize_items(orders),
            "order_count": orders.len(),
        });

        Ok(self.hbs.render(PRINT_ORDERS, &ctx)?)
    }
}

fn order_ctx(order: &Order) -> Value {
    let b = &order.billing;
    let s = &order.shipping;

    let address = if b.address_2.is_empty() {
        format_value(&b.address_1)
    } else {
        format!("{}, {}", format_value(&b.address_1), b.address_2)
    };

    // only worth printing when it differs from the billing address
    let ship_to = if s.address_1.is_empty() || (s.address_1 == b.address_1 && s.city == b.city) {
        String::new()
    } else {
        format!("{} {}, {}, {}", s.first_name, s.last_name, s.address_1, s.city)
    };

    let items: Vec<Value> = order
        .line_items
        .iter()
        .map(|item| {
            json!({
                "name": item.name,
                "parent_name": item.parent_name,
                "sku": item.sku,
                "quantity": item.quantity,
                "total": format_price(&item.total, &order.currency),
                "image": item.image.as_ref().map(|i| i.src.clone()),
            })
        })
        .collect();

    let item_count: u64 = order.line_items.iter().map(|i| u64::from(i.quantity)).sum();

    json!({
        "id": order.id,
        "date_created": format_date(&order.date_created),
        "date_paid": order.date_paid.as_deref().map(format_date).unwrap_or_else(|| "Not paid".to_string()),
        "customer_name": format!("{} {}", format_value(&b.first_name), format_value(&b.last_name)),
        "company": format_value(&b.company),
        "address": address,
        "city": format_value(&b.city),
        "phone": format_value(&b.phone),
        "email": format_value(b.email.as_deref().unwrap_or_default()),
        "ship_to": ship_to,
        "items": items,
        "item_count": item_count,
        "shipping_method": order.shipping_lines.first().map(|l| l.method_title.clone()),
        "shipping_total": format_price(&order.shipping_total, &order.currency),
        "total": format_price(&order.total, &order.currency),
        "payment_method": format_value(&order.payment_method_title),
        "customer_note": order.customer_note.trim(),
    })
}

pub fn format_value(v: &str) -> String {
    if v.trim().is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        v.to_string()
    }
}

/// Two decimal places, rounded half away from zero. Unparsable amounts print
/// as zero.
pub fn format_price(amount: &str, currency: &str) -> String {
    let n = Decimal::from_str(amount.trim())
        .unwrap_or_default()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if currency.is_empty() {
        format!("{n:.2}")
    } else {
        format!("{n:.2} {currency}")
    }
}

/// `YYYY-MM-DD` for RFC 3339 and WooCommerce's zone-less timestamps;
/// anything else is printed as-is.
pub fn format_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return dt.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}
