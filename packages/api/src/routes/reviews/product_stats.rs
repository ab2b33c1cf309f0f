use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    rating::{self, RatingSummary},
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsEnvelope {
    pub success: bool,
    pub data: RatingSummary,
}

/// Rating statistics over the product's approved reviews. A product with
/// no approved reviews yields the zeroed structure, not an error; the
/// storefront renders it as "no ratings yet".
#[utoipa::path(
    get,
    path = "/reviews/product/{product_id}/stats",
    tag = "reviews",
    params(
        ("product_id" = String, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Average, count and 1-5 histogram", body = StatsEnvelope)
    )
)]
#[tracing::instrument(name = "GET /reviews/product/{product_id}/stats", skip(state))]
pub async fn product_stats(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<StatsEnvelope>, ApiError> {
    let data = rating::product_stats(&state.db, &product_id).await?;

    Ok(Json(StatsEnvelope {
        success: true,
        data,
    }))
}
