use axum::{
    Extension, Json,
    extract::{Query, State},
};
use futures::TryStreamExt;
use mongodb::bson::doc;
use serde::Serialize;

use crate::{
    entity::order::Order,
    error::ApiError,
    middleware::jwt::AppUser,
    routes::PaginationParams,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct OrderListEnvelope {
    pub success: bool,
    pub orders: Vec<Order>,
}

/// Lists the calling customer's own orders, newest first. There is no way
/// to reach another user's orders through this endpoint; admins use the
/// back-office listing instead.
#[utoipa::path(
    get,
    path = "/orders",
    tag = "orders",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u64>, Query, description = "Page size, capped at 50")
    ),
    responses(
        (status = 200, description = "The caller's orders, newest first", body = Object),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_token" = [])
    )
)]
#[tracing::instrument(name = "GET /orders", skip(state, user))]
pub async fn get_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<OrderListEnvelope>, ApiError> {
    let sub = user.sub()?;
    let (skip, limit) = pagination.resolve();

    let orders: Vec<Order> = state
        .orders()
        .find(doc! { "user": &sub })
        .sort(doc! { "createdAt": -1 })
        .skip(skip)
        .limit(limit)
        .await?
        .try_collect()
        .await?;

    Ok(Json(OrderListEnvelope {
        success: true,
        orders,
    }))
}
