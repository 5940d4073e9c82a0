use axum::{extract::Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::Category;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

/// GET /api/categories - List all categories
pub async fn get_categories(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _user: AuthedUser,
) -> Result<Json<Vec<Category>>, ApiError> {
    let state = state_lock.read().await.clone();

    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, name, slug, created_at FROM categories ORDER BY name ASC",
    )
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(categories))
}
