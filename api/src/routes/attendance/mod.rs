//! Attendance token route handlers

pub mod issue;
pub mod recent;
pub mod redeem;
pub mod stats;

pub use issue::issue_token;
pub use recent::recent_tokens;
pub use redeem::redeem_token;
pub use stats::token_stats;
