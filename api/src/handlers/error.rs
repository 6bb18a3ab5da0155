//! Conversion of domain errors into localised HTTP error envelopes

use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::{header, StatusCode},
    HttpRequest, HttpResponse,
};

use qr_core::errors::{
    extract_english_message, extract_indonesian_message, DomainError, TokenError,
};
use qr_shared::{error_codes, ErrorResponse, Language};

use crate::dto::ErrorResponseExt;

/// Detect language preference from the Accept-Language header
pub fn extract_language(req: &HttpRequest) -> Language {
    req.headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .map(Language::from_accept_language)
        .unwrap_or_default()
}

/// HTTP status for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Unauthorized => StatusCode::FORBIDDEN,
        DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Token(TokenError::TokenGenerationFailed) => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Token(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

/// User-facing message for a domain error in the requested language
pub fn localized_message(error: &DomainError, lang: Language) -> String {
    match error {
        DomainError::Validation { message } => match lang {
            Language::English => message.clone(),
            Language::Indonesian => format!("Data permintaan tidak valid: {}", message),
        },
        DomainError::NotFound { resource } => match lang {
            Language::English => format!("Resource not found: {}", resource),
            Language::Indonesian => format!("Data tidak ditemukan: {}", resource),
        },
        DomainError::Unauthorized => lang
            .pick(
                "You are not allowed to manage this attendance session",
                "Anda tidak berhak mengelola sesi presensi ini",
            )
            .to_string(),
        DomainError::Internal { .. } => lang
            .pick("An internal error occurred", "Terjadi kesalahan internal")
            .to_string(),
        DomainError::Token(token_error) => {
            let message = token_error.to_string();
            match lang {
                Language::English => extract_english_message(&message),
                Language::Indonesian => extract_indonesian_message(&message),
            }
        }
    }
}

/// Handle domain errors with language support
pub fn handle_domain_error_with_lang(error: &DomainError, lang: Language) -> HttpResponse {
    let status = status_for(error);
    if status.is_server_error() {
        log::error!("Domain Error: {:?}", error);
    } else {
        log::debug!("Domain Error: {:?}", error);
    }

    let mut response = ErrorResponse::new(error.error_code(), localized_message(error, lang));
    if let DomainError::NotFound { resource } = error {
        response = response.add_detail("resource", resource);
    }

    response.to_response(status)
}

/// Handle domain errors using the caller's Accept-Language
pub fn handle_domain_error(req: &HttpRequest, error: &DomainError) -> HttpResponse {
    handle_domain_error_with_lang(error, extract_language(req))
}

/// 401 envelope for missing or invalid bearer tokens
pub fn unauthorized_response(lang: Language) -> HttpResponse {
    ErrorResponse::new(
        error_codes::UNAUTHORIZED,
        lang.pick(
            "Missing or invalid bearer token",
            "Token autentikasi tidak ada atau tidak valid",
        ),
    )
    .to_response(StatusCode::UNAUTHORIZED)
}

/// 404 envelope for unknown routes
pub fn not_found_response(lang: Language) -> HttpResponse {
    ErrorResponse::new(
        error_codes::NOT_FOUND,
        lang.pick(
            "The requested resource was not found",
            "Sumber daya yang diminta tidak ditemukan",
        ),
    )
    .to_response(StatusCode::NOT_FOUND)
}

fn bad_request(req: &HttpRequest, detail: String) -> actix_web::Error {
    let error = DomainError::Validation { message: detail };
    let response = handle_domain_error(req, &error);
    actix_web::error::InternalError::from_response(error, response).into()
}

/// Turns malformed JSON bodies into validation envelopes
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    bad_request(req, format!("Invalid JSON body: {}", err))
}

/// Turns malformed path parameters into validation envelopes
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    bad_request(req, format!("Invalid path parameter: {}", err))
}

/// Turns malformed query strings into validation envelopes
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    bad_request(req, format!("Invalid query string: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&TokenError::NoActiveSession.into()), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(&TokenError::SessionEnded.into()), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status_for(&TokenError::TokenGenerationFailed.into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status_for(&DomainError::Unauthorized), StatusCode::FORBIDDEN);
        assert_eq!(
            status_for(&DomainError::NotFound { resource: "session 9".to_string() }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&DomainError::Validation { message: "empty".to_string() }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_token_messages_are_localized() {
        let error: DomainError = TokenError::SessionEnded.into();
        assert_eq!(
            localized_message(&error, Language::English),
            "Attendance session has ended"
        );
        assert_eq!(
            localized_message(&error, Language::Indonesian),
            "Sesi presensi sudah berakhir"
        );
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let error = DomainError::Internal { message: "connection refused".to_string() };
        assert!(!localized_message(&error, Language::English).contains("connection"));
    }

    #[test]
    fn test_language_from_request() {
        let req = actix_web::test::TestRequest::default()
            .insert_header((header::ACCEPT_LANGUAGE, "id-ID,id;q=0.9"))
            .to_http_request();
        assert_eq!(extract_language(&req), Language::Indonesian);

        let req = actix_web::test::TestRequest::default().to_http_request();
        assert_eq!(extract_language(&req), Language::English);
    }
}
