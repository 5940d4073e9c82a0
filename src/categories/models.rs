use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Category database model
/// Rows are seeded at startup and read-only in the application flows
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub created_at: Option<String>,
}
