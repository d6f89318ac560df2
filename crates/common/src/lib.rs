//! Shared utilities, configuration, and error handling for the PHA backend
//!
//! This crate provides common functionality used across the application:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping
//! - Request extractors with validation

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use db::{is_unique_violation, RepositoryError};
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
