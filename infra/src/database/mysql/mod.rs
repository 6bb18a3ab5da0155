//! MySQL implementations of the core repository ports

pub mod session_directory_impl;
pub mod token_repository_impl;

pub use session_directory_impl::MySqlSessionDirectory;
pub use token_repository_impl::MySqlTokenRepository;
