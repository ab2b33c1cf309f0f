use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::{
    entity::order::Order,
    error::ApiError,
    lifecycle::{self, CancelActor},
    middleware::jwt::AppUser,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct OrderEnvelope {
    pub success: bool,
    pub order: Order,
}

#[utoipa::path(
    put,
    path = "/orders/number/{order_number}/cancel",
    tag = "orders",
    params(
        ("order_number" = String, Path, description = "Human-readable order number")
    ),
    responses(
        (status = 200, description = "Order cancelled", body = Object),
        (status = 400, description = "Order is no longer pending"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Order belongs to another customer"),
        (status = 404, description = "No order with this number")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_token" = [])
    )
)]
#[tracing::instrument(name = "PUT /orders/number/{order_number}/cancel", skip(state, user))]
pub async fn cancel_order(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(order_number): Path<String>,
) -> Result<Json<OrderEnvelope>, ApiError> {
    let sub = user.sub()?;
    let order =
        lifecycle::cancel_order(&state.db, &order_number, CancelActor::Customer(sub)).await?;

    Ok(Json(OrderEnvelope {
        success: true,
        order,
    }))
}
