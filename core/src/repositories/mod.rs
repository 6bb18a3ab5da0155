pub mod session;
pub mod token;

pub use session::{InMemorySessionDirectory, SessionDirectory};
pub use token::{InMemoryTokenRepository, TokenRepository};
