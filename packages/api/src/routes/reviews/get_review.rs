use axum::{
    Extension, Json,
    extract::{Path, State},
};
use mongodb::bson::doc;
use serde::Serialize;

use crate::{
    entity::review::{Review, ReviewStatus},
    error::ApiError,
    middleware::jwt::AppUser,
    not_found,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct ReviewEnvelope {
    pub success: bool,
    pub review: Review,
}

/// Unmoderated reviews are only visible to their author and to admins;
/// everyone else gets a 404 rather than a hint that the review exists.
#[utoipa::path(
    get,
    path = "/reviews/{review_id}",
    tag = "reviews",
    params(
        ("review_id" = String, Path, description = "Review id")
    ),
    responses(
        (status = 200, description = "The review", body = Object),
        (status = 404, description = "Review not found or not visible")
    )
)]
#[tracing::instrument(name = "GET /reviews/{review_id}", skip(state, user))]
pub async fn get_review(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(review_id): Path<String>,
) -> Result<Json<ReviewEnvelope>, ApiError> {
    let review = state
        .reviews()
        .find_one(doc! { "_id": &review_id })
        .await?
        .ok_or_else(|| not_found!("Review {} not found", review_id))?;

    if review.status != ReviewStatus::Approved {
        let is_owner = user.sub().map(|sub| sub == review.user).unwrap_or(false);
        if !is_owner && !user.is_admin() {
            return Err(not_found!("Review {} not found", review_id));
        }
    }

    Ok(Json(ReviewEnvelope {
        success: true,
        review,
    }))
}
