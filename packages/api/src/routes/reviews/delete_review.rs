use axum::{
    Extension, Json,
    extract::{Path, State},
};
use mongodb::bson::doc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::ApiError, forbidden, middleware::jwt::AppUser, not_found, state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteReviewResponse {
    pub success: bool,
    pub message: String,
}

#[utoipa::path(
    delete,
    path = "/reviews/{review_id}",
    tag = "reviews",
    params(
        ("review_id" = String, Path, description = "Review id")
    ),
    responses(
        (status = 200, description = "Review deleted", body = DeleteReviewResponse),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the owner and not an admin"),
        (status = 404, description = "Review not found")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_token" = [])
    )
)]
#[tracing::instrument(name = "DELETE /reviews/{review_id}", skip(state, user))]
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(review_id): Path<String>,
) -> Result<Json<DeleteReviewResponse>, ApiError> {
    let sub = user.sub()?;

    let reviews = state.reviews();
    let review = reviews
        .find_one(doc! { "_id": &review_id })
        .await?
        .ok_or_else(|| not_found!("Review {} not found", review_id))?;

    if review.user != sub && !user.is_admin() {
        return Err(forbidden!("You can only delete your own reviews"));
    }

    reviews.delete_one(doc! { "_id": &review_id }).await?;
    tracing::info!("Review {} deleted by {}", review_id, sub);

    Ok(Json(DeleteReviewResponse {
        success: true,
        message: "Review deleted".to_string(),
    }))
}
