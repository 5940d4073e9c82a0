use super::models::{MessageResponse, ProductRequest};
use super::services::ProductsService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;

// ============================================================================
// Product CRUD Handlers
// ============================================================================

/// GET /api/products - List the caller's products
pub async fn get_products(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let products_service = ProductsService::new(app_state.db.clone());

    let products = products_service.list_for_user(&user.id).await?;

    Ok(Json(products))
}

/// POST /api/products - Create a new product
pub async fn create_product(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<ProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let products_service = ProductsService::new(app_state.db.clone());

    let product = products_service.create(&user.id, request).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/products/:id - Get one of the caller's products
pub async fn get_product_by_id(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let products_service = ProductsService::new(app_state.db.clone());

    let product = products_service.get_for_user(&product_id, &user.id).await?;

    Ok(Json(product))
}

/// PUT /api/products/:id - Update a product the caller owns
pub async fn update_product(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(product_id): Path<String>,
    Json(request): Json<ProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let products_service = ProductsService::new(app_state.db.clone());

    let product = products_service
        .update(&product_id, &user.id, request)
        .await?;

    Ok(Json(product))
}

/// DELETE /api/products/:id - Delete a product the caller owns
pub async fn delete_product(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let products_service = ProductsService::new(app_state.db.clone());

    products_service.delete(&product_id, &user.id).await?;

    Ok(Json(MessageResponse {
        message: "Product deleted successfully".to_string(),
    }))
}
