//! QR module - Rendering of token values for browsers and terminals

pub mod renderer;

#[cfg(test)]
mod tests;

pub use renderer::{SvgQrRenderer, TerminalQrRenderer};
