use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme},
};

/// Security scheme modifier to add authentication methods
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        // Bearer token issued by the external auth surface
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );

        // Same token delivered as a cookie by the storefront frontend
        components.add_security_scheme(
            "cookie_token",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("token"))),
        );

        // Shared secret for the scheduler-invoked sweep
        components.add_security_scheme(
            "cron_secret",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "x-cron-secret",
                "Shared secret for scheduled maintenance endpoints",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Glowcart API",
        description = "Order lifecycle and review aggregation for the Glowcart storefront"
    ),
    paths(
        crate::routes::health::health,
        crate::routes::health::db_health,
        crate::routes::orders::create_order::create_order,
        crate::routes::orders::get_orders::get_orders,
        crate::routes::orders::track_order::track_order,
        crate::routes::orders::cancel_order::cancel_order,
        crate::routes::orders::cancel_guest_order::cancel_guest_order,
        crate::routes::orders::auto_cancel_orders::auto_cancel_orders,
        crate::routes::admin::list_orders::list_orders,
        crate::routes::admin::update_order_status::update_order_status,
        crate::routes::reviews::create_review::create_review,
        crate::routes::reviews::list_reviews::list_reviews,
        crate::routes::reviews::get_review::get_review,
        crate::routes::reviews::update_review::update_review,
        crate::routes::reviews::delete_review::delete_review,
        crate::routes::reviews::toggle_helpful::toggle_helpful,
        crate::routes::reviews::product_stats::product_stats,
    ),
    components(schemas(
        crate::entity::order::OrderStatus,
        crate::entity::order::PaymentMethod,
        crate::entity::order::PaymentStatus,
        crate::entity::order::GuestInfo,
        crate::entity::order::DeliveryAddress,
        crate::entity::order::OrderItem,
        crate::entity::review::ReviewStatus,
        crate::permission::Role,
        crate::rating::HelpfulVote,
        crate::rating::RatingSummary,
        crate::routes::health::HealthResponse,
        crate::routes::health::DbHealthResponse,
        crate::routes::orders::create_order::CreateOrderInput,
        crate::routes::orders::auto_cancel_orders::AutoCancelResponse,
        crate::routes::admin::update_order_status::UpdateOrderStatusInput,
        crate::routes::reviews::create_review::CreateReviewInput,
        crate::routes::reviews::update_review::UpdateReviewInput,
        crate::routes::reviews::delete_review::DeleteReviewResponse,
        crate::routes::reviews::toggle_helpful::HelpfulEnvelope,
        crate::routes::reviews::product_stats::StatsEnvelope,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness and database checks"),
        (name = "orders", description = "Order creation, tracking and cancellation"),
        (name = "admin", description = "Back-office order management"),
        (name = "reviews", description = "Product reviews and rating statistics"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_builds_and_covers_the_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/orders"));
        assert!(doc.paths.paths.contains_key("/orders/auto-cancel"));
        assert!(doc.paths.paths.contains_key("/reviews/{review_id}/helpful"));
        assert!(
            doc.paths
                .paths
                .contains_key("/reviews/product/{product_id}/stats")
        );
    }
}
