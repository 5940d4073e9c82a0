use super::models::{LoginRequest, RegisterRequest};
use crate::common::{ValidationResult, Validator};

// ============================================================================
// Auth Validators
// ============================================================================

pub struct RegisterValidator;

impl Validator<RegisterRequest> for RegisterValidator {
    fn validate(&self, data: &RegisterRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.name.trim().len() < 2 {
            result.add_error("name", "Name must be at least 2 characters");
        }

        if !is_valid_email(&data.email) {
            result.add_error("email", "Invalid email address");
        }

        if data.password.len() < 6 {
            result.add_error("password", "Password must be at least 6 characters");
        }

        result
    }
}

pub struct LoginValidator;

impl Validator<LoginRequest> for LoginValidator {
    fn validate(&self, data: &LoginRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if !is_valid_email(&data.email) {
            result.add_error("email", "Invalid email address");
        }

        if data.password.len() < 6 {
            result.add_error("password", "Password must be at least 6 characters");
        }

        result
    }
}

/// Structural email check: one '@', non-empty local part, dotted domain
pub fn is_valid_email(email: &str) -> bool {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let (local, domain) = (parts[0], parts[1]);
    if local.is_empty() || domain.is_empty() {
        return false;
    }

    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
