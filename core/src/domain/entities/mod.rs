//! Domain entities representing core business objects.

pub mod operator;
pub mod session;
pub mod token;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use operator::{Operator, OperatorRole};
pub use session::AttendanceSession;
pub use token::{
    AttendanceToken, DEFAULT_TOKEN_LENGTH, DEFAULT_TOKEN_TTL_SECONDS, TOKEN_ALPHABET,
};
