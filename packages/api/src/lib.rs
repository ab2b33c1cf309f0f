use std::sync::Arc;

use axum::{Json, Router, middleware::from_fn_with_state, routing::get};
use error::ApiError;
use middleware::jwt::jwt_middleware;
use state::{AppState, State};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, decompression::RequestDecompressionLayer,
};
use utoipa::OpenApi;

pub mod entity;
mod middleware;
mod routes;

pub mod error;
pub mod lifecycle;
pub mod openapi;
pub mod permission;
pub mod rating;
pub mod state;

pub use axum;
pub use mongodb;
pub mod auth {
    use crate::middleware;
    pub use middleware::jwt::{AppUser, TokenClaims};
}

pub fn construct_router(state: Arc<State>) -> Router {
    let router = Router::new()
        .route("/", get(service_info))
        .route("/openapi.json", get(openapi_spec))
        .nest("/health", routes::health::routes())
        .nest("/orders", routes::orders::routes())
        .nest("/reviews", routes::reviews::routes())
        .nest("/admin", routes::admin::routes())
        .with_state(state.clone())
        .layer(from_fn_with_state(state, jwt_middleware))
        .layer(CorsLayer::permissive())
        .layer(
            ServiceBuilder::new()
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new()),
        );

    Router::new().nest("/api/v1", router)
}

#[derive(serde::Serialize)]
struct ServiceInfo {
    name: &'static str,
    version: &'static str,
}

#[tracing::instrument(name = "GET /")]
async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "glowcart",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[tracing::instrument(name = "GET /openapi.json")]
async fn openapi_spec() -> Result<Json<utoipa::openapi::OpenApi>, ApiError> {
    Ok(Json(openapi::ApiDoc::openapi()))
}
