use std::sync::Arc;

use glowcart_types::Result;
use mongodb::{Client, Collection, Database, bson::doc};

use crate::entity::{self, order::Order, product::Product, review::Review, user::User};
use crate::error::ApiError;
use crate::middleware::jwt::{TokenClaims, decode_token};

pub type AppState = Arc<State>;

/// Everything `State::new` needs. Values come from the server binary's env
/// config; nothing in this crate reads ambient globals.
#[derive(Debug, Clone)]
pub struct StateOptions {
    pub mongodb_uri: String,
    pub database: String,
    pub jwt_secret: String,
    pub cron_secret: String,
}

/// Process-wide context injected into every handler. Owns the database
/// handle and the verification secrets; created once at startup and torn
/// down explicitly.
pub struct State {
    pub db: Database,
    client: Client,
    jwt_secret: String,
    pub cron_secret: String,
}

impl State {
    pub async fn new(options: StateOptions) -> Result<Self> {
        let client = Client::with_uri_str(&options.mongodb_uri).await?;
        let db = client.database(&options.database);

        db.run_command(doc! { "ping": 1 }).await?;
        entity::ensure_indexes(&db).await?;

        Ok(Self {
            db,
            client,
            jwt_secret: options.jwt_secret,
            cron_secret: options.cron_secret,
        })
    }

    pub fn orders(&self) -> Collection<Order> {
        self.db.collection(entity::ORDERS)
    }

    pub fn products(&self) -> Collection<Product> {
        self.db.collection(entity::PRODUCTS)
    }

    pub fn reviews(&self) -> Collection<Review> {
        self.db.collection(entity::REVIEWS)
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection(entity::USERS)
    }

    pub fn validate_token(&self, token: &str) -> Result<TokenClaims, ApiError> {
        decode_token(&self.jwt_secret, token)
    }

    /// Releases the connection pool. Call once the server loop has exited.
    pub async fn shutdown(&self) {
        self.client.clone().shutdown().await;
    }
}
