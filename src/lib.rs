//! Library entrypoint for PrintSync.
//!
//! This file exists mainly to make controller tests easy (integration tests
//! under `tests/` can build the app state with a fake upstream and drive the
//! real routers).

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;

// Keep these modules at crate root so they read as `crate::auth`,
// `crate::render`, and `crate::templates`.
#[path = "middleware/auth.rs"]
pub mod auth;

pub mod services;

#[path = "views/render.rs"]
pub mod render;
#[path = "views/templates.rs"]
pub mod templates;

pub mod controllers;
pub mod routes;

use services::{
    aggregator::OrderAggregator, order_source::OrderSource, print_state::PrintCoordinator,
    token_blacklist::TokenBlacklist,
};

#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub source: Arc<dyn OrderSource>,
    pub printer: Arc<dyn render::PrintRenderer>,
    pub blacklist: TokenBlacklist,
}

impl AppState {
    pub fn new(
        settings: config::Settings,
        source: Arc<dyn OrderSource>,
        printer: Arc<dyn render::PrintRenderer>,
    ) -> Self {
        Self {
            settings,
            source,
            printer,
            blacklist: TokenBlacklist::new(),
        }
    }

    pub fn aggregator(&self) -> OrderAggregator {
        OrderAggregator::new(self.source.clone())
    }

    pub fn coordinator(&self) -> PrintCoordinator {
        PrintCoordinator::new(self.source.clone(), self.printer.clone())
    }
}
