//! Common utility functions

pub mod duration;

pub use duration::{format_countdown, format_ttl};
