pub mod error;

pub use error::{extract_language, handle_domain_error, handle_domain_error_with_lang};
