//! Health check response

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health status values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall health status
    pub status: HealthStatus,

    /// Service name
    pub service: String,

    /// Storage backend in use ("mysql" or "memory")
    pub storage: String,

    /// Server timestamp
    pub timestamp: DateTime<Utc>,

    /// Server version
    pub version: String,
}

impl HealthResponse {
    /// Build a healthy response for the given service
    pub fn healthy(service: impl Into<String>, storage: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            service: service.into(),
            storage: storage.into(),
            timestamp: Utc::now(),
            version: version.into(),
        }
    }
}
