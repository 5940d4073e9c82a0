use super::handlers;
use axum::{routing::get, Router};

/// Creates the categories router
pub fn categories_routes() -> Router {
    Router::new().route("/api/categories", get(handlers::get_categories))
}
