use serde::{Deserialize, Serialize};

use super::Order;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 20;
// WooCommerce rejects anything larger
pub const MAX_PER_PAGE: u32 = 100;

/// A validated page window. Absent, unparsable or non-positive inputs fall
/// back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self::from_parts(Some(page), Some(per_page))
    }

    pub fn parse(page: Option<&str>, per_page: Option<&str>) -> Self {
        Self::from_parts(
            page.and_then(|s| s.trim().parse::<u32>().ok()),
            per_page.and_then(|s| s.trim().parse::<u32>().ok()),
        )
    }

    fn from_parts(page: Option<u32>, per_page: Option<u32>) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(DEFAULT_PAGE);
        let per_page = per_page
            .filter(|p| *p >= 1)
            .unwrap_or(DEFAULT_PER_PAGE)
            .min(MAX_PER_PAGE);

        Self { page, per_page }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersPage {
    pub orders: Vec<Order>,
    pub total_orders: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub per_page: u32,
    pub actual_orders_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderCounts {
    pub printed: usize,
    pub unprinted: usize,
}

impl OrderCounts {
    pub fn tally(orders: &[Order]) -> Self {
        let printed = orders.iter().filter(|o| o.is_printed).count();
        Self {
            printed,
            unprinted: orders.len() - printed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllOrders {
    pub orders: Vec<Order>,
    pub counts: OrderCounts,
}
