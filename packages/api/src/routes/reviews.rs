pub mod create_review;
pub mod delete_review;
pub mod get_review;
pub mod list_reviews;
pub mod product_stats;
pub mod toggle_helpful;
pub mod update_review;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(create_review::create_review).get(list_reviews::list_reviews),
        )
        .route(
            "/{review_id}",
            get(get_review::get_review)
                .put(update_review::update_review)
                .delete(delete_review::delete_review),
        )
        .route(
            "/{review_id}/helpful",
            post(toggle_helpful::toggle_helpful),
        )
        .route(
            "/product/{product_id}/stats",
            get(product_stats::product_stats),
        )
}
