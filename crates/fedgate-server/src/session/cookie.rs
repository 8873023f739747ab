//! Sealed session cookie
//!
//! One cookie carries the session-id/session-secret pair inside an
//! authenticated-encryption envelope (the cookie crate's private jar,
//! AES-GCM under a 64-byte server key). No other claims are stored
//! client-side; a cookie that fails to open is treated as no session.

use base64::{engine::general_purpose::STANDARD, Engine};
use cookie::{Cookie, CookieJar, Key, SameSite};
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "fedgate-session";

/// The session-id/session-secret pair stored inside the sealed cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTicket {
    #[serde(rename = "id")]
    pub session_id: String,
    #[serde(rename = "secret")]
    pub secret: String,
}

/// Seals and opens session cookies under the server's cookie key
pub struct CookieCodec {
    key: Key,
}

impl CookieCodec {
    /// Build a codec from raw key bytes (64 bytes required)
    pub fn new(key_bytes: &[u8]) -> Result<Self> {
        let key = Key::try_from(key_bytes)
            .map_err(|e| GatewayError::Configuration(format!("cookie key: {}", e)))?;
        Ok(Self { key })
    }

    /// Build a codec from a base64-encoded key
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| GatewayError::Configuration(format!("cookie key is not base64: {}", e)))?;
        Self::new(&bytes)
    }

    /// Generate a fresh random key (development and tests)
    pub fn generate() -> Self {
        Self { key: Key::generate() }
    }

    /// Seal a ticket into a `Set-Cookie` header value
    pub fn seal(&self, ticket: &SessionTicket) -> Result<String> {
        let payload = serde_json::to_string(ticket)
            .map_err(|e| GatewayError::Configuration(format!("ticket serialization: {}", e)))?;

        let mut cookie = Cookie::new(SESSION_COOKIE, payload);
        cookie.set_http_only(true);
        cookie.set_secure(true);
        cookie.set_same_site(SameSite::Strict);
        cookie.set_path("/");

        let mut jar = CookieJar::new();
        jar.private_mut(&self.key).add(cookie);
        let sealed = jar
            .get(SESSION_COOKIE)
            .ok_or_else(|| GatewayError::Configuration("cookie jar lost the session cookie".into()))?;
        Ok(sealed.encoded().to_string())
    }

    /// Open the session ticket from a `Cookie` request header value.
    ///
    /// Returns `None` when the cookie is missing, fails authentication, or
    /// does not decode; all are treated as the absence of a session.
    pub fn open(&self, cookie_header: &str) -> Option<SessionTicket> {
        for part in cookie_header.split(';') {
            let Ok(cookie) = Cookie::parse_encoded(part.trim().to_string()) else {
                continue;
            };
            if cookie.name() != SESSION_COOKIE {
                continue;
            }
            let mut jar = CookieJar::new();
            jar.add_original(cookie);
            let opened = jar.private(&self.key).get(SESSION_COOKIE)?;
            return serde_json::from_str(opened.value()).ok();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket() -> SessionTicket {
        SessionTicket {
            session_id: "172d2825-6caf-47e9-9555-d5c2c171a8d9".into(),
            secret: "s3cr3t-s3ssion-k3y".into(),
        }
    }

    #[test]
    fn test_seal_then_open_round_trips() {
        let codec = CookieCodec::generate();
        let sealed = codec.seal(&ticket()).unwrap();

        // the header value a browser would send back is just name=value
        let header = sealed.split(';').next().unwrap();
        assert_eq!(codec.open(header).unwrap(), ticket());
    }

    #[test]
    fn test_plaintext_never_visible_in_cookie() {
        let codec = CookieCodec::generate();
        let sealed = codec.seal(&ticket()).unwrap();
        assert!(!sealed.contains("s3cr3t-s3ssion-k3y"));
        assert!(!sealed.contains("172d2825"));
    }

    #[test]
    fn test_cookie_attributes_set() {
        let codec = CookieCodec::generate();
        let sealed = codec.seal(&ticket()).unwrap();
        assert!(sealed.contains("HttpOnly"));
        assert!(sealed.contains("Secure"));
        assert!(sealed.contains("SameSite=Strict"));
    }

    #[test]
    fn test_open_with_wrong_key_fails() {
        let sealer = CookieCodec::generate();
        let opener = CookieCodec::generate();
        let sealed = sealer.seal(&ticket()).unwrap();
        let header = sealed.split(';').next().unwrap();
        assert!(opener.open(header).is_none());
    }

    #[test]
    fn test_open_ignores_other_cookies() {
        let codec = CookieCodec::generate();
        let sealed = codec.seal(&ticket()).unwrap();
        let header = format!("theme=dark; {}; lang=en", sealed.split(';').next().unwrap());
        assert_eq!(codec.open(&header).unwrap(), ticket());
    }

    #[test]
    fn test_garbage_cookie_is_no_session() {
        let codec = CookieCodec::generate();
        assert!(codec.open("fedgate-session=not-an-encrypted-value").is_none());
        assert!(codec.open("").is_none());
    }

    #[test]
    fn test_short_key_rejected() {
        assert!(matches!(
            CookieCodec::new(&[0u8; 16]),
            Err(GatewayError::Configuration(_))
        ));
    }
}
