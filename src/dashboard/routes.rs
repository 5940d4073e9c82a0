use super::handlers;
use axum::{routing::get, Router};

/// Creates the dashboard router
pub fn dashboard_routes() -> Router {
    Router::new().route("/api/dashboard/metrics", get(handlers::get_dashboard_metrics))
}
