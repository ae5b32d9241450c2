//! Shared errors and configuration for Tenor.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;

pub use config::{AppConfig, CompletionRule, DatabaseConfig, LendingConfig, SweeperConfig};
pub use error::{AppError, AppResult};
