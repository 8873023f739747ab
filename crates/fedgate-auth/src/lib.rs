//! Federation Gateway Authenticators
//!
//! Turns request credentials into validated [`Identity`] values through one
//! of several pluggable mechanisms:
//!
//! - **Negotiate**: SPNEGO/Kerberos service tickets
//! - **LDAP Basic**: basic-auth verified by a directory bind/search/rebind
//! - **Kerberos Basic**: basic-auth verified against a KDC
//! - **Static Basic**: a single shared secret, for integration testing only
//!
//! Mechanism selection is a pure function of the `Authorization` header
//! scheme and server configuration; see [`select_mechanism`].
//!
//! ## Usage
//!
//! ```ignore
//! use fedgate_auth::{AuthEngine, AuthConfig};
//!
//! let engine = AuthEngine::new(config).with_directory(directory);
//! let identity = engine.authenticate(header_value).await?;
//! ```
//!
//! The Kerberos KDC and the LDAP server are external identity providers;
//! this crate defines the client-side contracts against them
//! ([`TicketValidator`], [`KdcClient`], [`Directory`]).

pub mod authenticator;
pub mod config;
pub mod error;
pub mod krb_basic;
pub mod ldap;
pub mod negotiate;
pub mod static_secret;

pub use authenticator::{select_mechanism, AuthEngine, Authenticator, Mechanism};
pub use config::{AuthConfig, BasicProtocol, LdapConfig, StaticSecretConfig};
pub use error::{AuthError, Result};
pub use krb_basic::KdcClient;
pub use ldap::{Directory, DirectoryEntry, LdapDirectory};
pub use negotiate::{TicketIdentity, TicketValidator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
