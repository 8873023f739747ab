//! Session management
//!
//! A process-wide cache maps high-entropy session secrets to cached
//! identities with two expiry watermarks; the secret reaches the client only
//! inside a sealed (authenticated-encryption) cookie. A process restart
//! invalidates all sessions.

pub mod cache;
pub mod cookie;

pub use cache::SessionCache;
pub use cookie::{CookieCodec, SessionTicket, SESSION_COOKIE};
