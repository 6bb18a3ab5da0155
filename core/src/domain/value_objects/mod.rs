//! Value objects representing immutable domain concepts.

pub mod expiry;
pub mod issued_token;
pub mod redemption;
pub mod session_id;
pub mod token_stats;


// Re-export commonly used types
pub use expiry::{instant_from_epoch, parse_expiry, remaining_seconds, Expiry, EPOCH_MILLIS_THRESHOLD};
pub use issued_token::IssuedToken;
pub use redemption::Redemption;
pub use session_id::SessionId;
pub use token_stats::{HourlyCount, TokenStats, TokenSummary};
