//! Result of a successful token scan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::SessionId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redemption {
    pub session_id: SessionId,
    pub token_id: Uuid,
    /// Scan count after this redemption
    pub scan_count: u32,
    pub redeemed_at: DateTime<Utc>,
}
