//! Issuer module - Client side of the token issuance API

pub mod http_client;

pub use http_client::HttpIssuerClient;
