use axum::{
    Extension, Json,
    extract::{Path, State},
};
use mongodb::{
    bson::{DateTime, Document, doc, to_bson},
    options::ReturnDocument,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    entity::review::{AdminResponse, Review, ReviewStatus},
    error::ApiError,
    forbidden, invalid_state,
    middleware::jwt::AppUser,
    not_found, rating,
    state::AppState,
};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewInput {
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    /// Admin only: moderation decision.
    #[serde(default)]
    pub status: Option<ReviewStatus>,
    /// Admin only: public response shown under the review. The timestamp
    /// is assigned server-side.
    #[serde(default)]
    pub admin_response: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewEnvelope {
    pub success: bool,
    pub review: Review,
}

#[utoipa::path(
    put,
    path = "/reviews/{review_id}",
    tag = "reviews",
    params(
        ("review_id" = String, Path, description = "Review id")
    ),
    request_body = UpdateReviewInput,
    responses(
        (status = 200, description = "Updated review", body = Object),
        (status = 400, description = "Invalid content or review no longer editable"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the owner and not an admin"),
        (status = 404, description = "Review not found")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_token" = [])
    )
)]
#[tracing::instrument(name = "PUT /reviews/{review_id}", skip(state, user, input))]
pub async fn update_review(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(review_id): Path<String>,
    Json(input): Json<UpdateReviewInput>,
) -> Result<Json<ReviewEnvelope>, ApiError> {
    let sub = user.sub()?;
    let is_admin = user.is_admin();

    let reviews = state.reviews();
    let review = reviews
        .find_one(doc! { "_id": &review_id })
        .await?
        .ok_or_else(|| not_found!("Review {} not found", review_id))?;

    let is_owner = review.user == sub;
    if !is_owner && !is_admin {
        return Err(forbidden!("You can only edit your own reviews"));
    }

    if !is_admin && (input.status.is_some() || input.admin_response.is_some()) {
        return Err(forbidden!("Moderation fields require admin access"));
    }

    let edits_content = input.rating.is_some()
        || input.title.is_some()
        || input.comment.is_some()
        || input.images.is_some();
    if edits_content && !is_admin && review.status != ReviewStatus::Pending {
        return Err(invalid_state!(
            "Only pending reviews can be edited; this review is {}",
            review.status.as_str()
        ));
    }

    // Validate the would-be content as a whole, not field by field.
    let rating_value = input.rating.unwrap_or(review.rating);
    let title = input.title.as_deref().unwrap_or(&review.title);
    let comment = input.comment.as_deref().unwrap_or(&review.comment);
    let images = input.images.as_deref().unwrap_or(&review.images);
    rating::validate_review_content(rating_value, title, comment, images)?;

    let mut set = Document::new();
    if let Some(rating_value) = input.rating {
        set.insert("rating", rating_value);
    }
    if let Some(title) = input.title {
        set.insert("title", title);
    }
    if let Some(comment) = input.comment {
        set.insert("comment", comment);
    }
    if let Some(images) = input.images {
        set.insert("images", images);
    }
    if let Some(status) = input.status {
        set.insert("status", status.as_str());
    }
    if let Some(message) = input.admin_response {
        let response = AdminResponse {
            message,
            responded_at: DateTime::now(),
        };
        set.insert("adminResponse", to_bson(&response)?);
    }
    set.insert("updatedAt", DateTime::now());

    let updated = reviews
        .find_one_and_update(doc! { "_id": &review_id }, doc! { "$set": set })
        .return_document(ReturnDocument::After)
        .await?
        .ok_or_else(|| not_found!("Review {} not found", review_id))?;

    Ok(Json(ReviewEnvelope {
        success: true,
        review: updated,
    }))
}
