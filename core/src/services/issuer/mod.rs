//! Token issuer module
//!
//! This module handles the server side of attendance tokens:
//! - Minting and rotating the current token of a session
//! - Redeeming scanned token values
//! - Recent-token history and issuance statistics
//! - Background cleanup of long-expired tokens

mod cleanup;
mod config;
mod generator;
mod service;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
pub use config::{IssuerConfig, MAX_RECENT_TOKENS_LIMIT};
pub use generator::TokenGenerator;
pub use service::TokenIssuerService;
