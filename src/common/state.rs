// Application state shared across all modules

use reqwest::Client;
use sqlx::SqlitePool;

use crate::auth::config::AuthProviders;

/// Application state containing database pool, HTTP client, and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub http: Client,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub providers: AuthProviders,
}
