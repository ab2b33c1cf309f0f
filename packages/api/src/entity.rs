use glowcart_types::Result;
use mongodb::{Database, IndexModel, bson::doc, options::IndexOptions};

pub mod order;
pub mod product;
pub mod review;
pub mod user;

pub const ORDERS: &str = "orders";
pub const PRODUCTS: &str = "products";
pub const REVIEWS: &str = "reviews";
pub const USERS: &str = "users";

/// Creates the unique indexes the API's correctness depends on: order
/// numbers, one review per (product, user) pair, and user emails. The
/// indexes, not application pre-checks, are the authority on uniqueness.
pub async fn ensure_indexes(db: &Database) -> Result<()> {
    let unique = || IndexOptions::builder().unique(true).build();

    db.collection::<order::Order>(ORDERS)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "orderNumber": 1 })
                .options(unique())
                .build(),
        )
        .await?;

    db.collection::<review::Review>(REVIEWS)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "product": 1, "user": 1 })
                .options(unique())
                .build(),
        )
        .await?;

    db.collection::<user::User>(USERS)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(unique())
                .build(),
        )
        .await?;

    Ok(())
}
