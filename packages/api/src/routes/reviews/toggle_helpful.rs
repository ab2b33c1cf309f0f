use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    middleware::jwt::AppUser,
    rating::{self, HelpfulVote},
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct HelpfulEnvelope {
    pub success: bool,
    pub data: HelpfulVote,
}

/// Marks or unmarks the review as helpful for the calling user. The toggle
/// is its own inverse: calling it twice restores the original count.
#[utoipa::path(
    post,
    path = "/reviews/{review_id}/helpful",
    tag = "reviews",
    params(
        ("review_id" = String, Path, description = "Review id")
    ),
    responses(
        (status = 200, description = "New helpful count and the caller's vote state", body = HelpfulEnvelope),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Review not found")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_token" = [])
    )
)]
#[tracing::instrument(name = "POST /reviews/{review_id}/helpful", skip(state, user))]
pub async fn toggle_helpful(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(review_id): Path<String>,
) -> Result<Json<HelpfulEnvelope>, ApiError> {
    let sub = user.sub()?;
    let data = rating::toggle_helpful(&state.db, &review_id, &sub).await?;

    Ok(Json(HelpfulEnvelope {
        success: true,
        data,
    }))
}
