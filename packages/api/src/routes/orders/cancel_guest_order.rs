use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::{
    entity::order::Order,
    error::ApiError,
    lifecycle::{self, CancelActor},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct OrderEnvelope {
    pub success: bool,
    pub order: Order,
}

/// Guest cancellation. Possession of the order number is the ONLY
/// credential here: guest orders carry no recoverable identity, so there
/// is nothing stronger to check. Orders owned by a registered account are
/// refused and must go through the authenticated endpoint.
#[utoipa::path(
    put,
    path = "/orders/number/{order_number}/cancel-guest",
    tag = "orders",
    params(
        ("order_number" = String, Path, description = "Human-readable order number")
    ),
    responses(
        (status = 200, description = "Order cancelled", body = Object),
        (status = 400, description = "Order is no longer pending"),
        (status = 403, description = "Order belongs to a registered account"),
        (status = 404, description = "No order with this number")
    )
)]
#[tracing::instrument(name = "PUT /orders/number/{order_number}/cancel-guest", skip(state))]
pub async fn cancel_guest_order(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<Json<OrderEnvelope>, ApiError> {
    let order = lifecycle::cancel_order(&state.db, &order_number, CancelActor::Guest).await?;

    Ok(Json(OrderEnvelope {
        success: true,
        order,
    }))
}
