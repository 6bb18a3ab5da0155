//! Rotating token display client
//!
//! Keeps the QR code on a lecture-hall screen in sync with the issuer:
//! - Requests a token for the bound session and renders it
//! - Schedules exactly one rotation shortly after expiry
//! - Coalesces overlapping triggers into a single in-flight request
//! - Discards responses that arrive after the bound session changed

mod boundary;
mod client;
mod error;
mod local;
mod state;

#[cfg(test)]
mod tests;

pub use boundary::{IssuerClient, QrFormat, QrRenderer, RenderError, RenderedQr};
pub use client::{RotationOutcome, RotationTrigger, TokenClient, TokenClientContext};
pub use error::ClientError;
pub use local::LocalIssuerClient;
pub use state::{ClientSnapshot, ClientStatus, DisplayState, HeldToken, Phase};
