//! Environment-driven server configuration
//!
//! All knobs come from `FEDGATE_*` environment variables. Missing optional
//! sections (LDAP, static secret) simply leave their mechanism unavailable;
//! dispatch then reports a configuration mismatch for requests that need it.

use std::env;
use std::time::Duration;

use fedgate_auth::{AuthConfig, BasicProtocol, LdapConfig, StaticSecretConfig};
use tracing::warn;

use crate::error::{GatewayError, Result};

/// Server configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    pub auth: AuthConfig,
    pub ldap: Option<LdapConfig>,
    pub static_secret: Option<StaticSecretConfig>,
    /// Sliding idle timeout for sessions; also the reaper sweep interval
    pub session_active_timeout: Duration,
    /// Hard session lifetime
    pub session_total_duration: Duration,
    /// Base64 cookie key (64 bytes decoded); generated when unset
    pub cookie_key: Option<String>,
    pub vault_address: String,
    pub vault_token: String,
    pub sts_region: String,
    pub default_session_name_template: String,
    pub secret_path_prefix: String,
    /// Timeout applied to each external call
    pub upstream_timeout: Duration,
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn required(name: &str) -> Result<String> {
    var(name).ok_or_else(|| GatewayError::Configuration(format!("{} must be set", name)))
}

fn parse_secs(name: &str, default: u64) -> Result<Duration> {
    match var(name) {
        None => Ok(Duration::from_secs(default)),
        Some(raw) => raw
            .parse()
            .map(Duration::from_secs)
            .map_err(|_| GatewayError::Configuration(format!("{} must be seconds", name))),
    }
}

fn parse_bool(name: &str) -> bool {
    matches!(var(name).as_deref(), Some("1") | Some("true") | Some("yes"))
}

impl GatewayConfig {
    /// Load the configuration from the environment
    pub fn from_env() -> Result<Self> {
        let port = match var("FEDGATE_PORT") {
            None => 8443,
            Some(raw) => raw
                .parse()
                .map_err(|_| GatewayError::Configuration("FEDGATE_PORT must be a port".into()))?,
        };

        let basic_protocol: BasicProtocol = var("FEDGATE_BASIC_PROTOCOL")
            .as_deref()
            .unwrap_or("ldap")
            .parse()
            .map_err(GatewayError::Configuration)?;

        let auth = AuthConfig {
            negotiate_enabled: parse_bool("FEDGATE_NEGOTIATE_ENABLED"),
            basic_enabled: parse_bool("FEDGATE_BASIC_ENABLED"),
            basic_protocol,
            kerberos_realm: var("FEDGATE_KERBEROS_REALM").unwrap_or_default(),
        };

        let upstream_timeout = parse_secs("FEDGATE_UPSTREAM_TIMEOUT_SECS", 10)?;

        let ldap = match var("FEDGATE_LDAP_URL") {
            None => None,
            Some(url) => Some(LdapConfig {
                url,
                bind_dn: required("FEDGATE_LDAP_BIND_DN")?,
                bind_password: required("FEDGATE_LDAP_BIND_PASSWORD")?,
                base_dn: required("FEDGATE_LDAP_BASE_DN")?,
                username_attribute: var("FEDGATE_LDAP_USERNAME_ATTRIBUTE")
                    .unwrap_or_else(|| "uid".into()),
                object_class: var("FEDGATE_LDAP_OBJECT_CLASS"),
                membership_attribute: var("FEDGATE_LDAP_MEMBERSHIP_ATTRIBUTE")
                    .unwrap_or_else(|| "memberOf".into()),
                display_name_attribute: var("FEDGATE_LDAP_DISPLAY_NAME_ATTRIBUTE"),
                timeout: upstream_timeout,
            }),
        };

        let static_secret = match var("FEDGATE_STATIC_SECRET") {
            None => None,
            Some(secret) => {
                warn!("Static-secret authentication is enabled; integration testing only");
                Some(StaticSecretConfig {
                    secret,
                    attribute: required("FEDGATE_STATIC_ATTRIBUTE")?,
                    realm: var("FEDGATE_STATIC_REALM").unwrap_or_else(|| "static".into()),
                })
            }
        };

        Ok(Self {
            port,
            auth,
            ldap,
            static_secret,
            // 10 minutes idle, 12 hours hard
            session_active_timeout: parse_secs("FEDGATE_SESSION_ACTIVE_TIMEOUT_SECS", 600)?,
            session_total_duration: parse_secs("FEDGATE_SESSION_TOTAL_SECS", 43_200)?,
            cookie_key: var("FEDGATE_COOKIE_KEY"),
            vault_address: required("FEDGATE_VAULT_ADDR")?,
            vault_token: required("FEDGATE_VAULT_TOKEN")?,
            sts_region: var("FEDGATE_STS_REGION").unwrap_or_else(|| "us-east-1".into()),
            default_session_name_template: var("FEDGATE_SESSION_NAME_TEMPLATE")
                .unwrap_or_else(|| "${username}@${domain}".into()),
            secret_path_prefix: var("FEDGATE_SECRET_PATH_PREFIX")
                .unwrap_or_else(|| "secret/fedgate".into()),
            upstream_timeout,
        })
    }
}
