//! Type definitions module
//!
//! - `language` - Response language negotiation
//! - `response` - Health check payload

pub mod language;
pub mod response;

// Re-export commonly used types at module level
pub use language::Language;
pub use response::{HealthResponse, HealthStatus};
