use axum::{Router, routing::post};
use crate::{AppState, controllers::auth_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/auth/login", post(auth_controller::post_login))
        .route("/auth/logout", post(auth_controller::post_logout))
}
