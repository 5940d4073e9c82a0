use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub image: Option<String>,
    pub user_id: String,
    pub category_id: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Product row joined with its category name for listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProductWithCategory {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub image: Option<String>,
    pub user_id: String,
    pub category_id: String,
    pub category_name: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Create/update request body
///
/// Price and stock arrive as strings, exactly as the product form submits
/// them; the validator parses both before anything is written.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub stock: String,
    pub category_id: String,
    pub image: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}
