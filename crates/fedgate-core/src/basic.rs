//! Basic-auth value parsing
//!
//! Decodes the base64 value of a `Basic` authorization header into domain,
//! username and password. Four equivalent domain/username encodings are
//! accepted: `domain\user`, `domain/user`, `user@domain` and bare `user`.
//! Exactly one separator type is honored per input.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{CoreError, Result};

/// Decoded basic-auth credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub domain: String,
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    /// Decode a base64 basic-auth token into credentials.
    ///
    /// Fails when the token is not base64, not UTF-8, or the decoded value
    /// contains no `:` password separator.
    pub fn parse(token: &str) -> Result<BasicCredentials> {
        let decoded = STANDARD
            .decode(token.trim())
            .map_err(|e| CoreError::InvalidBase64(e.to_string()))?;
        let decoded = String::from_utf8(decoded).map_err(|_| CoreError::InvalidEncoding)?;

        let (identity, password) = decoded
            .split_once(':')
            .ok_or(CoreError::MissingPasswordSeparator)?;

        let (domain, username) = if let Some((d, u)) = identity.split_once('\\') {
            (d, u)
        } else if let Some((d, u)) = identity.split_once('/') {
            (d, u)
        } else if let Some((u, d)) = identity.split_once('@') {
            (d, u)
        } else {
            ("", identity)
        };

        Ok(BasicCredentials {
            domain: domain.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}
