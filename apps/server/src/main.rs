#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use glowcart_api::{
    construct_router,
    state::{State, StateOptions},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Glowcart API service");

    let config = config::Config::from_env()?;

    let state = Arc::new(
        State::new(StateOptions {
            mongodb_uri: config.mongodb_uri.clone(),
            database: config.database.clone(),
            jwt_secret: config.jwt_secret.clone(),
            cron_secret: config.cron_secret.clone(),
        })
        .await?,
    );

    let app = construct_router(state.clone());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    state.shutdown().await;

    Ok(())
}
