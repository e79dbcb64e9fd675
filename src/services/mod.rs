pub mod order_source;
pub mod woocommerce;

pub mod aggregator;
pub mod item_summary;
pub mod print_state;

pub mod auth_service;
pub mod token_blacklist;
