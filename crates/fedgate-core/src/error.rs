//! Error types for fedgate-core

use thiserror::Error;

/// Result type alias using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors produced by the pure core types
#[derive(Error, Debug)]
pub enum CoreError {
    /// ARN string does not conform to the ARN grammar
    #[error("invalid ARN format: {0}")]
    InvalidArn(String),

    /// Basic-auth value is not valid base64
    #[error("basic auth value is not valid base64: {0}")]
    InvalidBase64(String),

    /// Decoded basic-auth value has no `:` separator
    #[error("basic auth value has no password separator")]
    MissingPasswordSeparator,

    /// Decoded basic-auth value is not valid UTF-8
    #[error("basic auth value is not valid UTF-8")]
    InvalidEncoding,
}
