// src/dashboard/handlers.rs

use axum::{extract::Extension, Json};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use super::models::{DashboardMetrics, StockOverviewItem};
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

/// GET /api/dashboard/metrics - Inventory summary for the calling user
pub async fn get_dashboard_metrics(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<DashboardMetrics>, ApiError> {
    let state = state_lock.read().await.clone();

    info!(user_id = %authed.id, "Fetching dashboard metrics");

    let metrics = compute_metrics(&state.db, &authed.id).await?;

    info!(
        user_id = %authed.id,
        total_stock = metrics.total_stock,
        total_value = metrics.total_value,
        product_count = metrics.product_count,
        "Dashboard metrics fetched successfully"
    );

    Ok(Json(metrics))
}

/// Aggregate one user's inventory numbers
pub async fn compute_metrics(
    db: &SqlitePool,
    user_id: &str,
) -> Result<DashboardMetrics, ApiError> {
    let total_stock = sqlx::query_scalar::<_, i64>(
        "SELECT CAST(COALESCE(SUM(stock), 0) AS INTEGER) FROM products WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_one(db)
    .await
    .map_err(|e| {
        error!(error = %e, "Database error fetching total stock for dashboard metrics");
        ApiError::DatabaseError(e)
    })?;

    let total_value = sqlx::query_scalar::<_, f64>(
        "SELECT CAST(COALESCE(SUM(price), 0) AS REAL) FROM products WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_one(db)
    .await
    .map_err(|e| {
        error!(error = %e, "Database error fetching total value for dashboard metrics");
        ApiError::DatabaseError(e)
    })?;

    let product_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error fetching product count for dashboard metrics");
                ApiError::DatabaseError(e)
            })?;

    // Top products by stock for the overview chart
    let overview_rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT name, stock
        FROM products
        WHERE user_id = ?
        ORDER BY stock DESC
        LIMIT 10
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .map_err(|e| {
        error!(error = %e, "Database error fetching stock overview for dashboard metrics");
        ApiError::DatabaseError(e)
    })?;

    let stock_overview: Vec<StockOverviewItem> = overview_rows
        .into_iter()
        .map(|(name, stock)| StockOverviewItem { name, stock })
        .collect();

    Ok(DashboardMetrics {
        total_stock,
        total_value,
        product_count,
        stock_overview,
        last_updated: chrono::Utc::now().to_rfc3339(),
    })
}
