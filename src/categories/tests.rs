//! Tests for categories module

#[cfg(test)]
mod tests {
    use super::super::*;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    use crate::common::migrations;

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

    #[test]
    fn test_category_model_structure() {
        let category = models::Category {
            id: "C_TEST01".to_string(),
            name: "Electronics".to_string(),
            slug: "electronics".to_string(),
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
        };

        assert_eq!(category.name, "Electronics");
        assert_eq!(category.slug, "electronics");
    }

    #[tokio::test]
    async fn test_default_categories_are_seeded() {
        let pool = test_pool().await;

        let slugs: Vec<(String,)> =
            sqlx::query_as("SELECT slug FROM categories ORDER BY slug ASC")
                .fetch_all(&pool)
                .await
                .expect("query failed");

        let slugs: Vec<&str> = slugs.iter().map(|(s,)| s.as_str()).collect();
        assert_eq!(slugs, vec!["books", "clothing", "electronics", "home-garden"]);
    }

    #[tokio::test]
    async fn test_seeding_is_idempotent() {
        let pool = test_pool().await;

        // A second migration pass (server restart) must not duplicate rows
        migrations::run_migrations(&pool)
            .await
            .expect("re-running migrations failed");

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
            .fetch_one(&pool)
            .await
            .expect("count query failed");

        assert_eq!(count, 4);
    }
}
