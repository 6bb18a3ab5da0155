//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the Presensi QR
//! services. It provides concrete implementations of the ports declared in
//! `qr_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL token repository and session directory using SQLx
//! - **Issuer**: HTTP client for the token issuer API
//! - **QR**: QR code rendering for browsers (SVG) and terminals
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

// Re-export core types for convenience
pub use qr_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Issuer module - HTTP client for the token issuance API
pub mod issuer;

/// QR module - Rendering of token values
pub mod qr;

pub use issuer::HttpIssuerClient;
pub use qr::{SvgQrRenderer, TerminalQrRenderer};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}
