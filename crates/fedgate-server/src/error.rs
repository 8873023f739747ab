//! Gateway error taxonomy
//!
//! Five terminal classes: configuration mismatch, credential rejection,
//! malformed input (rejected before any I/O), missing records, authorization
//! denial, and upstream failure. Nothing here retries; transient upstream
//! failures are the caller's to retry.

use thiserror::Error;

/// Result type alias using GatewayError
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors surfaced by the federation core
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Mechanism disabled or server misconfigured
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Bad password, ticket, or credential header
    #[error("unauthorized: {0}")]
    CredentialInvalid(String),

    /// Bad ARN, UUID, or cookie; rejected before any I/O
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Unknown role mapping or federation user
    #[error("not found: {0}")]
    NotFound(String),

    /// The identity holds no attribute permitted for the mapping
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Directory, token-service, or secret-store failure or timeout
    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl From<fedgate_core::CoreError> for GatewayError {
    fn from(err: fedgate_core::CoreError) -> Self {
        GatewayError::MalformedInput(err.to_string())
    }
}

impl From<fedgate_auth::AuthError> for GatewayError {
    fn from(err: fedgate_auth::AuthError) -> Self {
        use fedgate_auth::AuthError;
        match err {
            AuthError::Configuration(msg) => GatewayError::Configuration(msg),
            AuthError::CredentialInvalid(msg) => GatewayError::CredentialInvalid(msg),
            AuthError::Malformed(msg) => GatewayError::MalformedInput(msg),
            AuthError::Upstream(msg) => GatewayError::Upstream(msg),
        }
    }
}

impl From<crate::storage::StorageError> for GatewayError {
    fn from(err: crate::storage::StorageError) -> Self {
        match err {
            crate::storage::StorageError::NotFound(what) => GatewayError::NotFound(what),
            other => GatewayError::Upstream(other.to_string()),
        }
    }
}
