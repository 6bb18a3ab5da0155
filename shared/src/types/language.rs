//! Language and internationalization types

use serde::{Deserialize, Serialize};

/// Language used for user-facing messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "id")]
    Indonesian,
}

impl Language {
    /// Pick the highest-weighted supported language from an
    /// `Accept-Language` header value, defaulting to English.
    pub fn from_accept_language(header: &str) -> Self {
        let mut preferred = Language::English;
        let mut best_quality = 0.0_f32;

        for entry in header.split(',') {
            let mut parts = entry.trim().split(';');
            let tag = parts.next().unwrap_or_default().trim().to_lowercase();
            let quality = parts
                .find_map(|p| p.trim().strip_prefix("q=").and_then(|q| q.parse::<f32>().ok()))
                .unwrap_or(1.0);

            let candidate = if tag.starts_with("id") || tag.starts_with("in") {
                Some(Language::Indonesian)
            } else if tag.starts_with("en") {
                Some(Language::English)
            } else {
                None
            };

            if let Some(lang) = candidate {
                if quality > best_quality {
                    preferred = lang;
                    best_quality = quality;
                }
            }
        }

        preferred
    }

    /// Get language code (ISO 639-1)
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Indonesian => "id",
        }
    }

    /// Choose between an English and an Indonesian message
    pub fn pick<'a>(&self, en: &'a str, id: &'a str) -> &'a str {
        match self {
            Language::English => en,
            Language::Indonesian => id,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
