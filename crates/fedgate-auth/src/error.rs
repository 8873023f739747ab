//! Error types for the authenticator crate

use thiserror::Error;

/// Result type alias using AuthError
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while authenticating a request
#[derive(Error, Debug)]
pub enum AuthError {
    /// Mechanism disabled or misconfigured; never a caller problem
    #[error("authentication mechanism misconfigured: {0}")]
    Configuration(String),

    /// The supplied credential was rejected
    #[error("credential invalid: {0}")]
    CredentialInvalid(String),

    /// The credential-bearing header could not be parsed
    #[error("malformed credential: {0}")]
    Malformed(String),

    /// Directory, KDC, or validator I/O failure or timeout
    #[error("identity provider failure: {0}")]
    Upstream(String),
}

impl From<fedgate_core::CoreError> for AuthError {
    fn from(err: fedgate_core::CoreError) -> Self {
        AuthError::Malformed(err.to_string())
    }
}

impl From<ldap3::LdapError> for AuthError {
    fn from(err: ldap3::LdapError) -> Self {
        AuthError::Upstream(err.to_string())
    }
}
