use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::permission::Role;

/// Account record. Registration and login live in the external auth
/// surface; this service keeps the collection (and its unique email index)
/// because orders and reviews reference user ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime,
}
