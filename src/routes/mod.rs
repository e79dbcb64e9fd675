use std::path::PathBuf;

use axum::Router;
use axum::middleware::from_fn_with_state;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{AppState, controllers::home_controller};

pub mod home_routes;
pub mod auth_routes;
pub mod orders_routes;
pub mod products_routes;

pub fn app(state: AppState) -> Router {
    let api = Router::<AppState>::new();

    let api = auth_routes::add_routes(api);
    let api = orders_routes::add_routes(api);
    let api = products_routes::add_routes(api);
    let api = home_routes::add_api_routes(api);
    let api = api.fallback(home_controller::api_not_found);

    // the UI bundle; unknown paths get index.html so client-side routing works
    let static_dir = PathBuf::from(&state.settings.static_dir);
    let ui = ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    home_routes::add_routes(Router::new())
        .nest("/api", api)
        .fallback_service(ui)
        .layer(from_fn_with_state(state.clone(), crate::auth::require_auth))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
