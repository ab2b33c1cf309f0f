use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

/// Catalog entry. Managed by the external catalog surface; the order/review
/// core only reads it (existence checks, price snapshots).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    pub created_at: DateTime,
}

fn default_in_stock() -> bool {
    true
}
