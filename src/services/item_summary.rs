use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::Order;

/// Total quantity of one product across a batch of orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSummary {
    pub product_id: u64,
    pub name: String,
    pub quantity: u64,
    pub image: Option<String>,
}

/// Aggregates line items by product, ascending product id. The first line
/// seen for a product decides its name and image.
pub fn summarize_items(orders: &[Order]) -> Vec<ItemSummary> {
    let mut by_product: BTreeMap<u64, ItemSummary> = BTreeMap::new();

    for item in orders.iter().flat_map(|o| o.line_items.iter()) {
        by_product
            .entry(item.product_id)
            .and_modify(|s| s.quantity += u64::from(item.quantity))
            .or_insert_with(|| ItemSummary {
                product_id: item.product_id,
                name: item.name.clone(),
                quantity: u64::from(item.quantity),
                image: item.image.as_ref().map(|i| i.src.clone()),
            });
    }

    by_product.into_values().collect()
}
