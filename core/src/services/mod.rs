//! Business services containing domain logic and use cases.

pub mod client;
pub mod clock;
pub mod issuer;

// Re-export commonly used types
pub use client::{
    ClientError, ClientSnapshot, ClientStatus, DisplayState, HeldToken, IssuerClient,
    LocalIssuerClient, Phase, QrFormat, QrRenderer, RenderError, RenderedQr, RotationOutcome,
    RotationTrigger, TokenClient, TokenClientContext,
};
pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use issuer::{
    CleanupResult, IssuerConfig, TokenCleanupConfig, TokenCleanupService, TokenGenerator,
    TokenIssuerService,
};
