use serde::{Deserialize, Serialize};

/// One bar of the stock overview chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockOverviewItem {
    pub name: String,
    pub stock: i64,
}

/// Per-user inventory summary
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    /// Units across all of the user's products
    pub total_stock: i64,
    /// Combined inventory value (sum of product prices)
    pub total_value: f64,
    pub product_count: i64,
    /// Top products by stock quantity
    pub stock_overview: Vec<StockOverviewItem>,
    pub last_updated: String,
}
