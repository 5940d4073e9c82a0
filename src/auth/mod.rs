//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Credential verification (email/password against stored hashes)
//! - Identity reconciliation (mapping sign-ins onto durable user records)
//! - Session token issuance and validation
//! - AuthedUser extractor for protected routes

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod password;
pub mod routes;
pub mod services;
pub mod validators;

#[cfg(test)]
mod tests;

pub use extractors::AuthedUser;
pub use models::User;
pub use routes::auth_routes;
