use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    ensure_role,
    entity::order::{Order, OrderStatus},
    error::ApiError,
    lifecycle,
    middleware::jwt::AppUser,
    permission::Role,
    state::AppState,
};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateOrderStatusInput {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize)]
pub struct OrderEnvelope {
    pub success: bool,
    pub order: Order,
}

/// Back-office status progression. Every accepted move appends a tracking
/// entry; illegal moves (anything the state machine does not allow) are
/// rejected with the current status in the message.
#[utoipa::path(
    put,
    path = "/admin/orders/number/{order_number}/status",
    tag = "admin",
    params(
        ("order_number" = String, Path, description = "Human-readable order number")
    ),
    request_body = UpdateOrderStatusInput,
    responses(
        (status = 200, description = "Order moved to the requested status", body = Object),
        (status = 400, description = "Transition not permitted from the current status"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "No order with this number")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_token" = [])
    )
)]
#[tracing::instrument(name = "PUT /admin/orders/number/{order_number}/status", skip(state, user, input))]
pub async fn update_order_status(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(order_number): Path<String>,
    Json(input): Json<UpdateOrderStatusInput>,
) -> Result<Json<OrderEnvelope>, ApiError> {
    ensure_role!(user, Role::Admin);

    let order = lifecycle::progress_order(&state.db, &order_number, input.status).await?;

    Ok(Json(OrderEnvelope {
        success: true,
        order,
    }))
}
