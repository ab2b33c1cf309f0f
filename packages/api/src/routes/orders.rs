pub mod auto_cancel_orders;
pub mod cancel_guest_order;
pub mod cancel_order;
pub mod create_order;
pub mod get_orders;
pub mod track_order;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(create_order::create_order).get(get_orders::get_orders),
        )
        .route(
            "/auto-cancel",
            post(auto_cancel_orders::auto_cancel_orders),
        )
        .route("/number/{order_number}", get(track_order::track_order))
        .route(
            "/number/{order_number}/cancel",
            put(cancel_order::cancel_order),
        )
        .route(
            "/number/{order_number}/cancel-guest",
            put(cancel_guest_order::cancel_guest_order),
        )
}
