use std::collections::HashSet;

use axum::{Extension, Json, extract::State};
use glowcart_types::create_id;
use mongodb::bson::{DateTime, doc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    duplicate,
    entity::review::{Review, ReviewStatus},
    error::ApiError,
    middleware::jwt::AppUser,
    not_found, rating,
    state::AppState,
};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewInput {
    pub product: String,
    pub rating: i32,
    pub title: String,
    pub comment: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewEnvelope {
    pub success: bool,
    pub review: Review,
}

#[utoipa::path(
    post,
    path = "/reviews",
    tag = "reviews",
    request_body = CreateReviewInput,
    responses(
        (status = 200, description = "Review created, pending moderation", body = Object),
        (status = 400, description = "Invalid content or duplicate review"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Product does not exist")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_token" = [])
    )
)]
#[tracing::instrument(name = "POST /reviews", skip(state, user, input))]
pub async fn create_review(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Json(input): Json<CreateReviewInput>,
) -> Result<Json<ReviewEnvelope>, ApiError> {
    let sub = user.sub()?;

    rating::validate_review_content(input.rating, &input.title, &input.comment, &input.images)?;

    state
        .products()
        .find_one(doc! { "_id": &input.product })
        .await?
        .ok_or_else(|| not_found!("Product {} not found", input.product))?;

    // Friendly pre-check; the unique (product, user) index is the authority
    // and catches any insert racing past this read.
    let existing = state
        .reviews()
        .find_one(doc! { "product": &input.product, "user": &sub })
        .await?;
    if existing.is_some() {
        return Err(duplicate!("You have already reviewed this product"));
    }

    let verified_purchase = rating::has_verified_purchase(&state.db, &sub, &input.product).await?;

    let now = DateTime::now();
    let review = Review {
        id: create_id(),
        product: input.product,
        user: sub,
        rating: input.rating,
        title: input.title,
        comment: input.comment,
        images: input.images,
        verified_purchase,
        helpful: 0,
        helpful_votes: HashSet::new(),
        status: ReviewStatus::Pending,
        admin_response: None,
        created_at: now,
        updated_at: now,
    };

    match state.reviews().insert_one(&review).await {
        Ok(_) => {}
        Err(err) if crate::error::is_duplicate_key(&err) => {
            return Err(duplicate!("You have already reviewed this product"));
        }
        Err(err) => return Err(err.into()),
    }

    Ok(Json(ReviewEnvelope {
        success: true,
        review,
    }))
}
