//! # Categories Module
//!
//! Read-only category listing. The category set is seeded by the migration
//! pass at startup.

pub mod handlers;
pub mod models;
pub mod routes;

#[cfg(test)]
mod tests;

pub use routes::categories_routes;
