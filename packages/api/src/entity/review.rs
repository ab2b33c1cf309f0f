use std::collections::HashSet;

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Moderation state. Only `approved` reviews are publicly listed and only
/// they participate in rating aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponse {
    pub message: String,
    pub responded_at: DateTime,
}

/// A product review.
///
/// At most one review exists per (product, user) pair; a unique compound
/// index is the authority. `helpful` always equals the cardinality of
/// `helpful_votes`, and both are rewritten together in a single atomic
/// update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: String,
    pub product: String,
    pub user: String,
    pub rating: i32,
    pub title: String,
    pub comment: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub verified_purchase: bool,
    pub helpful: i64,
    #[serde(default)]
    pub helpful_votes: HashSet<String>,
    pub status: ReviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_response: Option<AdminResponse>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ReviewStatus::Approved).unwrap(),
            "\"approved\""
        );
        assert_eq!(ReviewStatus::Rejected.as_str(), "rejected");
    }

    #[test]
    fn helpful_votes_default_to_empty() {
        let review: Review = serde_json::from_str(
            r#"{
                "_id": "r1",
                "product": "p1",
                "user": "u1",
                "rating": 5,
                "title": "Great",
                "comment": "Lovely texture",
                "verifiedPurchase": false,
                "helpful": 0,
                "status": "pending",
                "createdAt": {"$date": {"$numberLong": "0"}},
                "updatedAt": {"$date": {"$numberLong": "0"}}
            }"#,
        )
        .unwrap();
        assert!(review.helpful_votes.is_empty());
        assert!(review.images.is_empty());
    }
}
