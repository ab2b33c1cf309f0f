//! Review aggregation: content validation, verified-purchase derivation,
//! the atomic helpful-vote toggle and on-demand rating statistics.

use std::collections::BTreeMap;

use mongodb::{
    Database,
    bson::{doc, to_bson},
    options::ReturnDocument,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entity::{
    self,
    order::OrderStatus,
    review::{Review, ReviewStatus},
};
use crate::error::ApiError;
use crate::{not_found, validation};

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_COMMENT_LEN: usize = 1000;
pub const MAX_IMAGES: usize = 5;

pub fn validate_review_content(
    rating: i32,
    title: &str,
    comment: &str,
    images: &[String],
) -> Result<(), ApiError> {
    if !(1..=5).contains(&rating) {
        return Err(validation!("Rating must be between 1 and 5"));
    }
    if title.trim().is_empty() {
        return Err(validation!("Review title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(validation!(
            "Review title cannot exceed {} characters",
            MAX_TITLE_LEN
        ));
    }
    if comment.trim().is_empty() {
        return Err(validation!("Review comment is required"));
    }
    if comment.chars().count() > MAX_COMMENT_LEN {
        return Err(validation!(
            "Review comment cannot exceed {} characters",
            MAX_COMMENT_LEN
        ));
    }
    if images.len() > MAX_IMAGES {
        return Err(validation!("A review can carry at most {} images", MAX_IMAGES));
    }
    Ok(())
}

/// A review counts as a verified purchase when the author has a delivered
/// order containing the product.
pub async fn has_verified_purchase(
    db: &Database,
    user: &str,
    product: &str,
) -> Result<bool, ApiError> {
    let count = db
        .collection::<crate::entity::order::Order>(entity::ORDERS)
        .count_documents(doc! {
            "user": user,
            "items.product": product,
            "status": OrderStatus::Delivered.as_str(),
        })
        .await?;
    Ok(count > 0)
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HelpfulVote {
    pub helpful: i64,
    pub is_marked_by_user: bool,
}

/// Toggles the caller's helpful vote in ONE atomic aggregation-pipeline
/// update: membership test, set add/remove and the `helpful = |set|`
/// recount all happen inside the storage engine. Splitting this into a
/// read followed by a write loses updates when two toggles race on the
/// same review.
pub async fn toggle_helpful(
    db: &Database,
    review_id: &str,
    user: &str,
) -> Result<HelpfulVote, ApiError> {
    let reviews = db.collection::<Review>(entity::REVIEWS);

    let votes_with_default = doc! { "$ifNull": ["$helpfulVotes", []] };
    let pipeline = vec![
        doc! { "$set": {
            "helpfulVotes": {
                "$cond": [
                    { "$in": [user, votes_with_default.clone()] },
                    { "$setDifference": [votes_with_default.clone(), [user]] },
                    { "$concatArrays": [votes_with_default, [user]] },
                ]
            }
        }},
        doc! { "$set": {
            "helpful": { "$size": "$helpfulVotes" },
            "updatedAt": "$$NOW",
        }},
    ];

    let updated = reviews
        .find_one_and_update(doc! { "_id": review_id }, pipeline)
        .return_document(ReturnDocument::After)
        .await?
        .ok_or_else(|| not_found!("Review {} not found", review_id))?;

    Ok(HelpfulVote {
        helpful: updated.helpful,
        is_marked_by_user: updated.helpful_votes.contains(user),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_reviews: i64,
    pub distribution: BTreeMap<String, i64>,
}

/// Folds a set of star ratings into the public statistics shape: average
/// rounded to one decimal place, total count, and a 1–5 histogram whose
/// buckets default to zero. An empty input yields the zeroed structure,
/// never an error.
pub fn summarize(ratings: impl IntoIterator<Item = i32>) -> RatingSummary {
    let mut distribution: BTreeMap<String, i64> =
        (1..=5).map(|star| (star.to_string(), 0)).collect();
    let mut total: i64 = 0;
    let mut sum: i64 = 0;

    for rating in ratings {
        if let Some(bucket) = distribution.get_mut(&rating.to_string()) {
            *bucket += 1;
            total += 1;
            sum += i64::from(rating);
        }
    }

    let average_rating = if total == 0 {
        0.0
    } else {
        (sum as f64 / total as f64 * 10.0).round() / 10.0
    };

    RatingSummary {
        average_rating,
        total_reviews: total,
        distribution,
    }
}

/// Recomputes the rating statistics for a product from its `approved`
/// reviews. Deliberately uncached: the collection is the single source of
/// truth.
pub async fn product_stats(db: &Database, product: &str) -> Result<RatingSummary, ApiError> {
    use futures::TryStreamExt;

    let reviews = db.collection::<Review>(entity::REVIEWS);
    let mut cursor = reviews
        .find(doc! {
            "product": product,
            "status": to_bson(&ReviewStatus::Approved)?,
        })
        .await?;

    let mut ratings = Vec::new();
    while let Some(review) = cursor.try_next().await? {
        ratings.push(review.rating);
    }

    Ok(summarize(ratings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_the_zeroed_structure() {
        let stats = summarize([]);
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.total_reviews, 0);
        for star in 1..=5 {
            assert_eq!(stats.distribution[&star.to_string()], 0);
        }
    }

    #[test]
    fn average_is_rounded_to_one_decimal() {
        // (5 + 4 + 4) / 3 = 4.333... -> 4.3
        let stats = summarize([5, 4, 4]);
        assert_eq!(stats.average_rating, 4.3);
        assert_eq!(stats.total_reviews, 3);

        // (5 + 4) / 2 = 4.5 stays exact
        assert_eq!(summarize([5, 4]).average_rating, 4.5);
    }

    #[test]
    fn distribution_counts_every_bucket() {
        let stats = summarize([1, 1, 3, 5, 5, 5]);
        assert_eq!(stats.distribution["1"], 2);
        assert_eq!(stats.distribution["2"], 0);
        assert_eq!(stats.distribution["3"], 1);
        assert_eq!(stats.distribution["4"], 0);
        assert_eq!(stats.distribution["5"], 3);
        assert_eq!(stats.total_reviews, 6);
    }

    #[test]
    fn out_of_range_ratings_are_ignored_rather_than_counted() {
        let stats = summarize([0, 6, 3]);
        assert_eq!(stats.total_reviews, 1);
        assert_eq!(stats.average_rating, 3.0);
    }

    #[test]
    fn content_validation_enforces_the_caps() {
        assert!(validate_review_content(5, "Nice", "Works well", &[]).is_ok());
        assert!(validate_review_content(0, "Nice", "Works well", &[]).is_err());
        assert!(validate_review_content(6, "Nice", "Works well", &[]).is_err());
        assert!(validate_review_content(4, "", "Works well", &[]).is_err());
        assert!(validate_review_content(4, "Nice", " ", &[]).is_err());
        assert!(validate_review_content(4, &"t".repeat(101), "ok", &[]).is_err());
        assert!(validate_review_content(4, "Nice", &"c".repeat(1001), &[]).is_err());

        let images: Vec<String> = (0..6).map(|i| format!("img-{i}.jpg")).collect();
        assert!(validate_review_content(4, "Nice", "ok", &images).is_err());
        assert!(validate_review_content(4, "Nice", "ok", &images[..5]).is_ok());
    }

    #[test]
    fn summary_serializes_with_the_public_field_names() {
        let json = serde_json::to_value(summarize([5])).unwrap();
        assert_eq!(json["averageRating"], 5.0);
        assert_eq!(json["totalReviews"], 1);
        assert_eq!(json["distribution"]["5"], 1);
    }
}
