pub mod list_orders;
pub mod update_order_status;

use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders::list_orders))
        .route(
            "/orders/number/{order_number}/status",
            put(update_order_status::update_order_status),
        )
}
