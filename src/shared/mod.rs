//! Shared Module
//!
//! Types used across the client: error types delivered to toggle callers and
//! the application configuration.

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use error::{MutationError, ToggleError};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
