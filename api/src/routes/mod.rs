//! HTTP route handlers
//!
//! - `attendance` - Token issuance, history, statistics and redemption
//! - `health` - Liveness and endpoint listing

pub mod attendance;
pub mod health;
