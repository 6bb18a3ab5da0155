mod directory;
pub mod memory;

pub use directory::SessionDirectory;
pub use memory::InMemorySessionDirectory;

#[cfg(test)]
mod tests;
