use super::models::ProductRequest;
use crate::common::{ValidationResult, Validator};

// ============================================================================
// Product Validators
// ============================================================================

pub struct ProductValidator;

impl Validator<ProductRequest> for ProductValidator {
    fn validate(&self, data: &ProductRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.name.trim().is_empty() {
            result.add_error("name", "Name is required");
        } else if data.name.len() > 255 {
            result.add_error("name", "Name must be less than 255 characters");
        }

        match parse_price(&data.price) {
            Some(price) if price > 0.0 => {}
            _ => result.add_error("price", "Price must be a positive number"),
        }

        match parse_stock(&data.stock) {
            Some(stock) if stock >= 0 => {}
            _ => result.add_error("stock", "Stock must be a non-negative number"),
        }

        if data.category_id.trim().is_empty() {
            result.add_error("category_id", "Category is required");
        }

        if let Some(image) = &data.image {
            if !image.is_empty()
                && !image.starts_with("http://")
                && !image.starts_with("https://")
            {
                result.add_error("image", "Image must be a valid URL");
            }
        }

        result
    }
}

/// Parse the submitted price string; `None` when it is not a finite number
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}

/// Parse the submitted stock string; `None` when it is not an integer
pub fn parse_stock(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}
