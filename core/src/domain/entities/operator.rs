//! Authenticated caller of the issuer API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role carried in the operator's bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorRole {
    /// Manages every session
    Admin,
    /// Manages sessions of assigned courses
    Lecturer,
}

impl OperatorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorRole::Admin => "admin",
            OperatorRole::Lecturer => "lecturer",
        }
    }
}

impl fmt::Display for OperatorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(OperatorRole::Admin),
            "lecturer" | "dosen" => Ok(OperatorRole::Lecturer),
            _ => Err(format!("Invalid operator role: {}", s)),
        }
    }
}

/// Identity of the user issuing or inspecting tokens
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operator {
    /// Subject of the bearer token
    pub id: String,
    pub role: OperatorRole,
}

impl Operator {
    pub fn new(id: impl Into<String>, role: OperatorRole) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn admin(id: impl Into<String>) -> Self {
        Self::new(id, OperatorRole::Admin)
    }

    pub fn lecturer(id: impl Into<String>) -> Self {
        Self::new(id, OperatorRole::Lecturer)
    }

    pub fn is_admin(&self) -> bool {
        self.role == OperatorRole::Admin
    }
}
