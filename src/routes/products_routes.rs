use axum::{Router, routing::get};
use crate::{AppState, controllers::products_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/products/:product_id", get(products_controller::get_product))
}
