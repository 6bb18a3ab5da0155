//! Collaborators of the display client: the issuer and the QR renderer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_objects::{IssuedToken, SessionId};

use super::error::ClientError;

/// Requests tokens from an issuer
#[async_trait]
pub trait IssuerClient: Send + Sync {
    /// Ask the issuer for the current token of a session
    ///
    /// # Arguments
    /// * `session_id` - The bound session
    /// * `force` - Invalidate the current token and mint a new one
    async fn request_token(
        &self,
        session_id: SessionId,
        force: bool,
    ) -> Result<IssuedToken, ClientError>;
}

/// Output format of a rendered QR code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrFormat {
    /// SVG document
    Svg,
    /// Terminal text using Unicode half blocks
    Text,
}

/// QR code rendered for one token value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedQr {
    /// The encoded token value
    pub payload: String,
    pub format: QrFormat,
    pub body: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to render QR code: {message}")]
pub struct RenderError {
    pub message: String,
}

/// Turns a token value into a displayable QR code
pub trait QrRenderer: Send + Sync {
    fn render(&self, payload: &str) -> Result<RenderedQr, RenderError>;
}
