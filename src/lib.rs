pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod readmodel;
pub mod response;
pub mod routes;
pub mod security;
pub mod services;

use std::sync::Arc;

use sqlx::PgPool;

pub use config::Config;
pub use error::{AppError, Result};

use services::{MediaStore, TokenService};

/// Shared application state, cloned into every worker.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: TokenService,
    pub media: Arc<dyn MediaStore>,
}

impl AppState {
    pub fn new(db: PgPool, tokens: TokenService, media: Arc<dyn MediaStore>) -> Self {
        Self { db, tokens, media }
    }
}
