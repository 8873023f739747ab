//! # Fedgate Core
//!
//! Core types for the federation gateway:
//!
//! - **ARN**: parse and validate Amazon Resource Names, the identifier
//!   grammar underlying every identity and policy comparison
//! - **Identity**: an authenticated principal with its authorization
//!   attributes and session identifier
//! - **Basic credentials**: decoding of HTTP basic-auth values with the four
//!   supported domain/username encodings
//! - **Audit detail**: the write-once outcome record attached to every
//!   authorization and federation attempt
//!
//! This crate performs no I/O; everything here is deterministic and usable
//! from both the authenticator and server crates.

pub mod arn;
pub mod audit;
pub mod basic;
pub mod error;
pub mod identity;

pub use arn::Arn;
pub use audit::{AuditDetail, AuditEvent};
pub use basic::BasicCredentials;
pub use error::{CoreError, Result};
pub use identity::Identity;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
