//! Error types for server startup and configuration
//!
//! The broadcast core itself never fails: URLs are opaque and transport
//! failures only drop the affected connection. Everything here concerns
//! getting the process up and shutting it down.

use thiserror::Error;

/// Errors raised while configuring or running the server
#[derive(Debug, Error)]
pub enum SlidecastError {
    #[error("invalid listen address '{value}': {source}")]
    InvalidAddress {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("gate code must be exactly 4 digits, got '{0}'")]
    InvalidGateCode(String),

    #[error("failed to install shutdown handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type used across the crate
pub type Result<T> = std::result::Result<T, SlidecastError>;
