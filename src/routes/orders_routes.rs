use axum::{Router, routing::{get, post, put}};

use crate::{AppState, controllers::orders_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/orders", get(orders_controller::get_orders))
        .route("/orders/all", get(orders_controller::get_all_orders))
        .route("/orders/count", get(orders_controller::get_orders_count))
        .route("/orders/print", post(orders_controller::post_print))
        .route("/orders/:order_id", put(orders_controller::put_order_status))
        .route(
            "/orders/:order_id/notes",
            get(orders_controller::get_order_notes).post(orders_controller::post_order_note),
        )
}
