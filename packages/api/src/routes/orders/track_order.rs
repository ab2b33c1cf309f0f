use axum::{
    Json,
    extract::{Path, State},
};
use mongodb::bson::doc;
use serde::Serialize;

use crate::{entity::order::Order, error::ApiError, not_found, state::AppState};

#[derive(Debug, Serialize)]
pub struct OrderEnvelope {
    pub success: bool,
    pub order: Order,
}

/// Public order tracking: anyone holding the order number can read the
/// order and its tracking history. No identity check on purpose, as guest
/// orders have nothing to authenticate against.
#[utoipa::path(
    get,
    path = "/orders/number/{order_number}",
    tag = "orders",
    params(
        ("order_number" = String, Path, description = "Human-readable order number")
    ),
    responses(
        (status = 200, description = "The matching order", body = Object),
        (status = 404, description = "No order with this number")
    )
)]
#[tracing::instrument(name = "GET /orders/number/{order_number}", skip(state))]
pub async fn track_order(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<Json<OrderEnvelope>, ApiError> {
    let order = state
        .orders()
        .find_one(doc! { "orderNumber": &order_number })
        .await?
        .ok_or_else(|| not_found!("Order {} not found", order_number))?;

    Ok(Json(OrderEnvelope {
        success: true,
        order,
    }))
}
