use sqlx::SqlitePool;
use tracing::info;

use super::models::{Product, ProductRequest, ProductWithCategory};
use super::validators::{parse_price, parse_stock, ProductValidator};
use crate::common::{generate_product_id, ApiError, Validator};

pub struct ProductsService {
    db: SqlitePool,
}

impl ProductsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    // ============================================================================
    // Product CRUD Operations
    // ============================================================================

    /// List the caller's products with category names, newest first
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<ProductWithCategory>, ApiError> {
        let products = sqlx::query_as::<_, ProductWithCategory>(
            r#"
            SELECT p.id, p.name, p.description, p.price, p.stock, p.image,
                   p.user_id, p.category_id, c.name AS category_name,
                   p.created_at, p.updated_at
            FROM products p
            JOIN categories c ON p.category_id = c.id
            WHERE p.user_id = ?
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(products)
    }

    /// Fetch one of the caller's products
    ///
    /// Absent and not-owned are answered identically so callers cannot probe
    /// other users' product ids.
    pub async fn get_for_user(
        &self,
        product_id: &str,
        user_id: &str,
    ) -> Result<Product, ApiError> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ? AND user_id = ?")
            .bind(product_id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))
    }

    /// Create a product owned by the calling user
    /// All validation and the category existence check run before the write
    pub async fn create(
        &self,
        user_id: &str,
        request: ProductRequest,
    ) -> Result<Product, ApiError> {
        let validation = ProductValidator.validate(&request);
        if !validation.is_valid {
            return Err(ApiError::from(validation));
        }

        self.ensure_category_exists(&request.category_id).await?;

        // Validator guarantees both parses succeed
        let price = parse_price(&request.price)
            .ok_or_else(|| ApiError::ValidationError("price: Price must be a positive number".to_string()))?;
        let stock = parse_stock(&request.stock)
            .ok_or_else(|| ApiError::ValidationError("stock: Stock must be a non-negative number".to_string()))?;

        let product_id = generate_product_id();
        let image = request.image.as_deref().filter(|s| !s.is_empty());

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, price, stock, image,
                user_id, category_id, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, datetime('now'), datetime('now'))
            "#,
        )
        .bind(&product_id)
        .bind(request.name.trim())
        .bind(request.description.as_deref().filter(|s| !s.is_empty()))
        .bind(price)
        .bind(stock)
        .bind(image)
        .bind(user_id)
        .bind(&request.category_id)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        info!(product_id = %product_id, user_id = %user_id, "Created product");

        self.get_for_user(&product_id, user_id).await
    }

    /// Replace a product the calling user owns
    /// The ownership check runs before validation; nothing is written on
    /// either failure
    pub async fn update(
        &self,
        product_id: &str,
        user_id: &str,
        request: ProductRequest,
    ) -> Result<Product, ApiError> {
        self.ensure_owned(product_id, user_id, "update").await?;

        let validation = ProductValidator.validate(&request);
        if !validation.is_valid {
            return Err(ApiError::from(validation));
        }

        self.ensure_category_exists(&request.category_id).await?;

        let price = parse_price(&request.price)
            .ok_or_else(|| ApiError::ValidationError("price: Price must be a positive number".to_string()))?;
        let stock = parse_stock(&request.stock)
            .ok_or_else(|| ApiError::ValidationError("stock: Stock must be a non-negative number".to_string()))?;

        sqlx::query(
            r#"
            UPDATE products
            SET name = ?, description = ?, price = ?, stock = ?, image = ?,
                category_id = ?, updated_at = datetime('now')
            WHERE id = ?
            "#,
        )
        .bind(request.name.trim())
        .bind(request.description.as_deref().filter(|s| !s.is_empty()))
        .bind(price)
        .bind(stock)
        .bind(request.image.as_deref().filter(|s| !s.is_empty()))
        .bind(&request.category_id)
        .bind(product_id)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        info!(product_id = %product_id, user_id = %user_id, "Updated product");

        self.get_for_user(product_id, user_id).await
    }

    /// Delete a product the calling user owns
    pub async fn delete(&self, product_id: &str, user_id: &str) -> Result<(), ApiError> {
        self.ensure_owned(product_id, user_id, "delete").await?;

        sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(product_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        info!(product_id = %product_id, user_id = %user_id, "Deleted product");

        Ok(())
    }

    // ============================================================================
    // Checks
    // ============================================================================

    /// Uniform ownership check: a missing row and someone else's row get the
    /// same answer
    async fn ensure_owned(
        &self,
        product_id: &str,
        user_id: &str,
        action: &str,
    ) -> Result<(), ApiError> {
        let owner: Option<(String,)> =
            sqlx::query_as("SELECT user_id FROM products WHERE id = ?")
                .bind(product_id)
                .fetch_optional(&self.db)
                .await
                .map_err(ApiError::DatabaseError)?;

        match owner {
            Some((owner_id,)) if owner_id == user_id => Ok(()),
            _ => Err(ApiError::Forbidden(format!(
                "Unauthorized to {} this product",
                action
            ))),
        }
    }

    async fn ensure_category_exists(&self, category_id: &str) -> Result<(), ApiError> {
        let existing: Option<(String,)> =
            sqlx::query_as("SELECT id FROM categories WHERE id = ?")
                .bind(category_id)
                .fetch_optional(&self.db)
                .await
                .map_err(ApiError::DatabaseError)?;

        if existing.is_none() {
            return Err(ApiError::ValidationError(
                "category_id: Category not found".to_string(),
            ));
        }

        Ok(())
    }
}
