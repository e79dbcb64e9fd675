use axum::{Router, routing::get};
use crate::{AppState, controllers::home_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/health", get(home_controller::health))
}

// mounted under /api, so behind the bearer check
pub fn add_api_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/health/upstream", get(home_controller::health_upstream))
}
