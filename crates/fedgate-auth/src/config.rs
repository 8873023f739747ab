//! Authenticator configuration
//!
//! Each mechanism carries only the configuration it needs; the engine-level
//! [`AuthConfig`] holds the per-scheme enable flags and the `Basic`
//! sub-protocol selection.

use std::time::Duration;

/// Sub-protocol backing the `Basic` scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicProtocol {
    /// Verify passwords by LDAP bind/search/rebind
    Ldap,
    /// Verify passwords against a Kerberos KDC
    Kerberos,
    /// Compare against a single shared secret (integration testing only)
    Static,
}

impl std::str::FromStr for BasicProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ldap" => Ok(BasicProtocol::Ldap),
            "kerberos" => Ok(BasicProtocol::Kerberos),
            "static" => Ok(BasicProtocol::Static),
            _ => Err(format!("unknown basic protocol: {}", s)),
        }
    }
}

/// LDAP directory settings for the LDAP-bind basic mechanism
#[derive(Debug, Clone)]
pub struct LdapConfig {
    /// Directory URL, e.g. `ldaps://ldap.example.org:636`
    pub url: String,
    /// Service account DN used for the initial bind and search
    pub bind_dn: String,
    /// Service account password
    pub bind_password: String,
    /// Search base for user entries
    pub base_dn: String,
    /// Attribute matched against the username, e.g. `sAMAccountName` or `uid`
    pub username_attribute: String,
    /// Optional object class constraint on the search filter
    pub object_class: Option<String>,
    /// Attribute whose values become the identity's authorization attributes
    pub membership_attribute: String,
    /// Attribute providing the display name, when present on the entry
    pub display_name_attribute: Option<String>,
    /// Connect timeout for directory operations
    pub timeout: Duration,
}

/// Shared-secret settings for the static basic mechanism
#[derive(Debug, Clone)]
pub struct StaticSecretConfig {
    /// The one accepted password
    pub secret: String,
    /// The one authorization attribute granted on success
    pub attribute: String,
    /// Realm reported on issued identities
    pub realm: String,
}

/// Engine-level mechanism configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Accept the `Negotiate` scheme
    pub negotiate_enabled: bool,
    /// Accept the `Basic` scheme
    pub basic_enabled: bool,
    /// Sub-protocol backing `Basic`
    pub basic_protocol: BasicProtocol,
    /// Kerberos realm reported on identities issued by the Kerberos variants
    pub kerberos_realm: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            negotiate_enabled: false,
            basic_enabled: false,
            basic_protocol: BasicProtocol::Ldap,
            kerberos_realm: String::new(),
        }
    }
}
