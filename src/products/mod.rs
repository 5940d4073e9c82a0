//! # Products Module
//!
//! This module handles all product-related functionality including:
//! - Product CRUD operations scoped to the owning user
//! - Request validation before any write
//! - Ownership enforcement

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


pub use routes::products_routes;
