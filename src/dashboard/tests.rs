//! Tests for dashboard module

#[cfg(test)]
mod tests {
    use super::super::*;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    use crate::auth::models::RegisterRequest;
    use crate::auth::services::AuthService;
    use crate::common::migrations;
    use crate::products::models::ProductRequest;
    use crate::products::services::ProductsService;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");

        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    async fn create_user(pool: &SqlitePool, email: &str) -> String {
        AuthService::new(pool.clone())
            .register(RegisterRequest {
                name: "Test User".to_string(),
                email: email.to_string(),
                password: "secret123".to_string(),
            })
            .await
            .expect("registration failed")
            .id
    }

    async fn add_product(pool: &SqlitePool, user_id: &str, name: &str, price: &str, stock: &str) {
        let category: (String,) = sqlx::query_as("SELECT id FROM categories LIMIT 1")
            .fetch_one(pool)
            .await
            .expect("seeded category missing");

        ProductsService::new(pool.clone())
            .create(
                user_id,
                ProductRequest {
                    name: name.to_string(),
                    description: None,
                    price: price.to_string(),
                    stock: stock.to_string(),
                    category_id: category.0,
                    image: None,
                },
            )
            .await
            .expect("product creation failed");
    }

    #[tokio::test]
    async fn test_empty_inventory_yields_zero_metrics() {
        let pool = test_pool().await;
        let user = create_user(&pool, "empty@example.com").await;

        let metrics = handlers::compute_metrics(&pool, &user)
            .await
            .expect("metrics failed");

        assert_eq!(metrics.total_stock, 0);
        assert_eq!(metrics.total_value, 0.0);
        assert_eq!(metrics.product_count, 0);
        assert!(metrics.stock_overview.is_empty());
    }

    #[tokio::test]
    async fn test_metrics_sum_stock_and_value() {
        let pool = test_pool().await;
        let user = create_user(&pool, "owner@example.com").await;

        add_product(&pool, &user, "Laptop", "1299.99", "15").await;
        add_product(&pool, &user, "Phone", "699.99", "30").await;
        add_product(&pool, &user, "Headphones", "199.99", "50").await;

        let metrics = handlers::compute_metrics(&pool, &user)
            .await
            .expect("metrics failed");

        assert_eq!(metrics.total_stock, 95);
        assert!((metrics.total_value - 2199.97).abs() < 1e-6);
        assert_eq!(metrics.product_count, 3);

        // Overview is ordered by stock, highest first
        let names: Vec<&str> = metrics
            .stock_overview
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["Headphones", "Phone", "Laptop"]);
    }

    #[tokio::test]
    async fn test_metrics_are_scoped_to_the_caller() {
        let pool = test_pool().await;
        let alice = create_user(&pool, "alice@example.com").await;
        let bob = create_user(&pool, "bob@example.com").await;

        add_product(&pool, &alice, "Laptop", "1299.99", "15").await;
        add_product(&pool, &bob, "Keyboard", "89.99", "200").await;

        let metrics = handlers::compute_metrics(&pool, &alice)
            .await
            .expect("metrics failed");

        assert_eq!(metrics.total_stock, 15);
        assert_eq!(metrics.product_count, 1);
        assert_eq!(metrics.stock_overview.len(), 1);
        assert_eq!(metrics.stock_overview[0].name, "Laptop");
    }

    #[tokio::test]
    async fn test_overview_caps_at_ten_products() {
        let pool = test_pool().await;
        let user = create_user(&pool, "bulk@example.com").await;

        for i in 0..12 {
            add_product(&pool, &user, &format!("Item {}", i), "10.00", &i.to_string()).await;
        }

        let metrics = handlers::compute_metrics(&pool, &user)
            .await
            .expect("metrics failed");

        assert_eq!(metrics.product_count, 12);
        assert_eq!(metrics.stock_overview.len(), 10);
        assert_eq!(metrics.stock_overview[0].stock, 11);
    }
}
