//! Shared utilities and common types for the Presensi QR server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error types and response structures
//! - Duration formatting for TTL and countdown labels
//! - Common type definitions

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, Environment,
    AttendanceConfig, ClientConfig, DatabaseConfig, JwtConfig,
    ServerConfig, LoggingConfig
};
pub use errors::{ErrorResponse, error_codes};
pub use types::{Language, HealthResponse};
pub use utils::duration;
