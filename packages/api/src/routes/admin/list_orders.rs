use axum::{
    Extension, Json,
    extract::{Query, State},
};
use futures::TryStreamExt;
use mongodb::bson::doc;
use serde::{Deserialize, Serialize};

use crate::{
    ensure_role,
    entity::order::{Order, OrderStatus},
    error::ApiError,
    middleware::jwt::AppUser,
    permission::Role,
    routes::PaginationParams,
    state::AppState,
};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OrderListParams {
    pub status: Option<OrderStatus>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct OrderListEnvelope {
    pub success: bool,
    pub orders: Vec<Order>,
    pub total: u64,
}

#[utoipa::path(
    get,
    path = "/admin/orders",
    tag = "admin",
    params(
        ("status" = Option<OrderStatus>, Query, description = "Filter by order status"),
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u64>, Query, description = "Page size, capped at 50")
    ),
    responses(
        (status = 200, description = "Orders across all customers, newest first", body = Object),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Admin access required")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_token" = [])
    )
)]
#[tracing::instrument(name = "GET /admin/orders", skip(state, user))]
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Query(params): Query<OrderListParams>,
) -> Result<Json<OrderListEnvelope>, ApiError> {
    ensure_role!(user, Role::Admin);

    let mut filter = doc! {};
    if let Some(status) = params.status {
        filter.insert("status", status.as_str());
    }

    let pagination = PaginationParams {
        page: params.page,
        limit: params.limit,
    };
    let (skip, limit) = pagination.resolve();

    let orders_collection = state.orders();
    let total = orders_collection.count_documents(filter.clone()).await?;

    let orders: Vec<Order> = orders_collection
        .find(filter)
        .sort(doc! { "createdAt": -1 })
        .skip(skip)
        .limit(limit)
        .await?
        .try_collect()
        .await?;

    Ok(Json(OrderListEnvelope {
        success: true,
        orders,
        total,
    }))
}
