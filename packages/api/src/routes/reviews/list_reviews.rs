use axum::{
    Extension, Json,
    extract::{Query, State},
};
use futures::TryStreamExt;
use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};

use crate::{
    entity::review::{Review, ReviewStatus},
    error::ApiError,
    middleware::jwt::AppUser,
    routes::PaginationParams,
    state::AppState,
};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ReviewListParams {
    pub product: Option<String>,
    pub user: Option<String>,
    pub status: Option<ReviewStatus>,
    pub rating: Option<i32>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub sort: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewListEnvelope {
    pub success: bool,
    pub reviews: Vec<Review>,
    pub total: u64,
}

/// Maps the public sort keys onto index-friendly sort documents. Unknown
/// values fall back to newest-first.
fn sort_document(sort: Option<&str>) -> Document {
    match sort.unwrap_or("newest") {
        "oldest" => doc! { "createdAt": 1 },
        "rating_high" => doc! { "rating": -1, "createdAt": -1 },
        "rating_low" => doc! { "rating": 1, "createdAt": -1 },
        "helpful" => doc! { "helpful": -1, "createdAt": -1 },
        _ => doc! { "createdAt": -1 },
    }
}

/// Moderation gate for listings: the public only ever sees `approved`
/// reviews; admins may ask for any status.
fn effective_status(requested: Option<ReviewStatus>, is_admin: bool) -> ReviewStatus {
    if is_admin {
        requested.unwrap_or(ReviewStatus::Approved)
    } else {
        ReviewStatus::Approved
    }
}

#[utoipa::path(
    get,
    path = "/reviews",
    tag = "reviews",
    params(
        ("product" = Option<String>, Query, description = "Filter by product id"),
        ("user" = Option<String>, Query, description = "Filter by author"),
        ("status" = Option<ReviewStatus>, Query, description = "Moderation status (admins only; public listings are always approved)"),
        ("rating" = Option<i32>, Query, description = "Filter by star value"),
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u64>, Query, description = "Page size, capped at 50"),
        ("sort" = Option<String>, Query, description = "newest | oldest | rating_high | rating_low | helpful")
    ),
    responses(
        (status = 200, description = "Matching reviews", body = Object)
    )
)]
#[tracing::instrument(name = "GET /reviews", skip(state, user))]
pub async fn list_reviews(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Query(params): Query<ReviewListParams>,
) -> Result<Json<ReviewListEnvelope>, ApiError> {
    let status = effective_status(params.status, user.is_admin());

    let mut filter = doc! { "status": status.as_str() };
    if let Some(product) = &params.product {
        filter.insert("product", product);
    }
    if let Some(author) = &params.user {
        filter.insert("user", author);
    }
    if let Some(rating) = params.rating {
        filter.insert("rating", rating);
    }

    let pagination = PaginationParams {
        page: params.page,
        limit: params.limit,
    };
    let (skip, limit) = pagination.resolve();

    let reviews_collection = state.reviews();
    let total = reviews_collection.count_documents(filter.clone()).await?;

    let reviews: Vec<Review> = reviews_collection
        .find(filter)
        .sort(sort_document(params.sort.as_deref()))
        .skip(skip)
        .limit(limit)
        .await?
        .try_collect()
        .await?;

    Ok(Json(ReviewListEnvelope {
        success: true,
        reviews,
        total,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_listings_are_always_approved() {
        assert_eq!(
            effective_status(Some(ReviewStatus::Pending), false),
            ReviewStatus::Approved
        );
        assert_eq!(effective_status(None, false), ReviewStatus::Approved);
    }

    #[test]
    fn admins_may_widen_the_status_filter() {
        assert_eq!(
            effective_status(Some(ReviewStatus::Rejected), true),
            ReviewStatus::Rejected
        );
        assert_eq!(effective_status(None, true), ReviewStatus::Approved);
    }

    #[test]
    fn unknown_sort_keys_fall_back_to_newest() {
        assert_eq!(sort_document(Some("bogus")), doc! { "createdAt": -1 });
        assert_eq!(sort_document(None), doc! { "createdAt": -1 });
        assert_eq!(sort_document(Some("oldest")), doc! { "createdAt": 1 });
    }
}
