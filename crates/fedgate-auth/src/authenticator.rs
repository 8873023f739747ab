//! Authenticator abstraction and mechanism dispatch
//!
//! Every mechanism variant implements [`Authenticator`]; selection is a pure
//! function of the `Authorization` header scheme and the engine
//! configuration. An [`AuthEngine`] owns the configured collaborators
//! (directory, ticket validator, KDC client) and constructs the right
//! variant per request.

use std::sync::Arc;

use async_trait::async_trait;
use fedgate_core::Identity;
use tracing::{debug, warn};

use crate::config::{AuthConfig, BasicProtocol, LdapConfig, StaticSecretConfig};
use crate::error::{AuthError, Result};
use crate::krb_basic::{KdcClient, KerberosBasicAuthenticator};
use crate::ldap::{Directory, LdapBasicAuthenticator};
use crate::negotiate::{NegotiateAuthenticator, TicketValidator};
use crate::static_secret::StaticBasicAuthenticator;

/// A mechanism that turns request credentials into an [`Identity`]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Human-readable mechanism label for error and audit messages
    fn mechanism(&self) -> &str;

    /// Authenticate the carried credential.
    ///
    /// A clean credential rejection is `AuthError::CredentialInvalid`;
    /// anything else is a configuration or upstream failure.
    async fn authenticate(&self) -> Result<Identity>;
}

/// The closed set of supported mechanisms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mechanism {
    Negotiate,
    LdapBasic,
    KerberosBasic,
    StaticBasic,
}

/// Select a mechanism from the header scheme and configuration.
///
/// `Bearer` is recognized but reserved; disabled or unknown schemes are a
/// configuration mismatch, distinct from a credential mismatch.
pub fn select_mechanism(scheme: &str, config: &AuthConfig) -> Result<Mechanism> {
    if scheme.eq_ignore_ascii_case("negotiate") {
        if !config.negotiate_enabled {
            return Err(AuthError::Configuration("Negotiate scheme is disabled".into()));
        }
        return Ok(Mechanism::Negotiate);
    }
    if scheme.eq_ignore_ascii_case("basic") {
        if !config.basic_enabled {
            return Err(AuthError::Configuration("Basic scheme is disabled".into()));
        }
        return Ok(match config.basic_protocol {
            BasicProtocol::Ldap => Mechanism::LdapBasic,
            BasicProtocol::Kerberos => Mechanism::KerberosBasic,
            BasicProtocol::Static => Mechanism::StaticBasic,
        });
    }
    if scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::Configuration("Bearer scheme is reserved".into()));
    }
    Err(AuthError::Configuration(format!(
        "unsupported authorization scheme: {}",
        scheme
    )))
}

/// Owns mechanism configuration and collaborators, and authenticates
/// `Authorization` header values
pub struct AuthEngine {
    config: AuthConfig,
    ldap_config: Option<LdapConfig>,
    static_config: Option<StaticSecretConfig>,
    directory: Option<Arc<dyn Directory>>,
    ticket_validator: Option<Arc<dyn TicketValidator>>,
    kdc: Option<Arc<dyn KdcClient>>,
}

impl AuthEngine {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            ldap_config: None,
            static_config: None,
            directory: None,
            ticket_validator: None,
            kdc: None,
        }
    }

    /// Attach the directory used by the LDAP basic mechanism
    pub fn with_directory(mut self, config: LdapConfig, directory: Arc<dyn Directory>) -> Self {
        self.ldap_config = Some(config);
        self.directory = Some(directory);
        self
    }

    /// Attach the service-ticket validator used by the Negotiate mechanism
    pub fn with_ticket_validator(mut self, validator: Arc<dyn TicketValidator>) -> Self {
        self.ticket_validator = Some(validator);
        self
    }

    /// Attach the KDC client used by the Kerberos basic mechanism
    pub fn with_kdc(mut self, kdc: Arc<dyn KdcClient>) -> Self {
        self.kdc = Some(kdc);
        self
    }

    /// Attach the static shared-secret configuration (integration testing)
    pub fn with_static_secret(mut self, config: StaticSecretConfig) -> Self {
        self.static_config = Some(config);
        self
    }

    /// Authenticate an `Authorization` header value.
    ///
    /// Splits the scheme token from the credential, selects the mechanism,
    /// and runs it.
    pub async fn authenticate(&self, header_value: &str) -> Result<Identity> {
        let (scheme, credential) = header_value
            .trim()
            .split_once(' ')
            .ok_or_else(|| AuthError::Malformed("authorization header has no credential".into()))?;
        let credential = credential.trim();

        let mechanism = select_mechanism(scheme, &self.config)?;
        let authenticator = self.build(mechanism, credential)?;

        debug!(mechanism = authenticator.mechanism(), "Authenticating request");
        match authenticator.authenticate().await {
            Ok(identity) => {
                debug!(
                    mechanism = authenticator.mechanism(),
                    username = identity.username(),
                    domain = identity.domain(),
                    "Authentication succeeded"
                );
                Ok(identity)
            }
            Err(err) => {
                warn!(
                    mechanism = authenticator.mechanism(),
                    error = %err,
                    "Authentication failed"
                );
                Err(err)
            }
        }
    }

    fn build(&self, mechanism: Mechanism, credential: &str) -> Result<Box<dyn Authenticator>> {
        match mechanism {
            Mechanism::Negotiate => {
                let validator = self.ticket_validator.clone().ok_or_else(|| {
                    AuthError::Configuration("no ticket validator configured".into())
                })?;
                Ok(Box::new(NegotiateAuthenticator::new(
                    credential.to_string(),
                    validator,
                )))
            }
            Mechanism::LdapBasic => {
                let config = self
                    .ldap_config
                    .clone()
                    .ok_or_else(|| AuthError::Configuration("no LDAP configuration".into()))?;
                let directory = self
                    .directory
                    .clone()
                    .ok_or_else(|| AuthError::Configuration("no directory configured".into()))?;
                Ok(Box::new(LdapBasicAuthenticator::new(
                    credential.to_string(),
                    config,
                    directory,
                )))
            }
            Mechanism::KerberosBasic => {
                let kdc = self
                    .kdc
                    .clone()
                    .ok_or_else(|| AuthError::Configuration("no KDC client configured".into()))?;
                Ok(Box::new(KerberosBasicAuthenticator::new(
                    credential.to_string(),
                    self.config.kerberos_realm.clone(),
                    kdc,
                )))
            }
            Mechanism::StaticBasic => {
                let config = self.static_config.clone().ok_or_else(|| {
                    AuthError::Configuration("no static secret configured".into())
                })?;
                Ok(Box::new(StaticBasicAuthenticator::new(
                    credential.to_string(),
                    config,
                )))
            }
        }
    }
}
