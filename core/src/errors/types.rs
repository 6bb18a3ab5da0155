//! Token error types with bilingual messages
//!
//! Messages carry English and Indonesian text separated by ` | `; the
//! presentation layer picks one side based on the caller's language.

use qr_shared::errors::error_codes;
use thiserror::Error;

/// Errors raised while issuing or redeeming attendance tokens
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Session is not open for attendance | Sesi presensi tidak aktif")]
    NoActiveSession,

    #[error("Token is invalid or has expired | Token tidak valid atau sudah kedaluwarsa")]
    TokenInvalid,

    #[error("Attendance session is inactive | Sesi presensi sudah dinonaktifkan")]
    SessionInactive,

    #[error("Attendance session has ended | Sesi presensi sudah berakhir")]
    SessionEnded,

    #[error("Failed to generate token | Gagal membuat token")]
    TokenGenerationFailed,
}

impl TokenError {
    /// Machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::NoActiveSession => error_codes::NO_ACTIVE_SESSION,
            TokenError::TokenInvalid => error_codes::TOKEN_INVALID,
            TokenError::SessionInactive => error_codes::SESSION_INACTIVE,
            TokenError::SessionEnded => error_codes::SESSION_ENDED,
            TokenError::TokenGenerationFailed => error_codes::TOKEN_GENERATION_FAILED,
        }
    }
}

/// Extract the English half of a bilingual message
pub fn extract_english_message(message: &str) -> String {
    message
        .split(" | ")
        .next()
        .unwrap_or(message)
        .trim()
        .to_string()
}

/// Extract the Indonesian half of a bilingual message
///
/// Falls back to the whole message when it is not bilingual.
pub fn extract_indonesian_message(message: &str) -> String {
    match message.split_once(" | ") {
        Some((_, indonesian)) => indonesian.trim().to_string(),
        None => message.trim().to_string(),
    }
}
