//! Kerberos Basic mechanism
//!
//! Verifies a username/password pair against the KDC (an AS exchange).
//! The exchange itself lives behind [`KdcClient`]; this module owns the
//! basic-value parsing, realm resolution and identity construction.

use std::sync::Arc;

use async_trait::async_trait;
use fedgate_core::{BasicCredentials, Identity};

use crate::authenticator::Authenticator;
use crate::error::{AuthError, Result};

/// Client-side KDC boundary.
///
/// `verify` returns `Ok(false)` when the KDC rejects the password and `Err`
/// only for transport trouble or timeouts.
#[async_trait]
pub trait KdcClient: Send + Sync {
    async fn verify(&self, username: &str, realm: &str, password: &str) -> Result<bool>;
}

/// The Kerberos Basic mechanism variant
pub struct KerberosBasicAuthenticator {
    credential: String,
    default_realm: String,
    kdc: Arc<dyn KdcClient>,
}

impl KerberosBasicAuthenticator {
    pub fn new(credential: String, default_realm: String, kdc: Arc<dyn KdcClient>) -> Self {
        Self {
            credential,
            default_realm,
            kdc,
        }
    }
}

#[async_trait]
impl Authenticator for KerberosBasicAuthenticator {
    fn mechanism(&self) -> &str {
        "Kerberos basic"
    }

    async fn authenticate(&self) -> Result<Identity> {
        let creds = BasicCredentials::parse(&self.credential)?;

        // the basic value's domain part overrides the configured realm
        let realm = if creds.domain.is_empty() {
            self.default_realm.clone()
        } else {
            creds.domain.clone()
        };
        if realm.is_empty() {
            return Err(AuthError::Configuration("no Kerberos realm configured".into()));
        }

        if !self.kdc.verify(&creds.username, &realm, &creds.password).await? {
            return Err(AuthError::CredentialInvalid(format!(
                "KDC rejected password for {}@{}",
                creds.username, realm
            )));
        }

        Ok(Identity::new(creds.username, realm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine};

    struct FakeKdc {
        realm: &'static str,
        password: &'static str,
    }

    #[async_trait]
    impl KdcClient for FakeKdc {
        async fn verify(&self, _username: &str, realm: &str, password: &str) -> Result<bool> {
            Ok(realm == self.realm && password == self.password)
        }
    }

    fn authenticator(raw: &str, default_realm: &str) -> KerberosBasicAuthenticator {
        KerberosBasicAuthenticator::new(
            STANDARD.encode(raw),
            default_realm.into(),
            Arc::new(FakeKdc {
                realm: "EXAMPLE.ORG",
                password: "hunter2",
            }),
        )
    }

    #[tokio::test]
    async fn test_default_realm_applies_to_bare_username() {
        let identity = authenticator("alice:hunter2", "EXAMPLE.ORG")
            .authenticate()
            .await
            .unwrap();
        assert_eq!(identity.username(), "alice");
        assert_eq!(identity.domain(), "EXAMPLE.ORG");
    }

    #[tokio::test]
    async fn test_supplied_domain_overrides_default_realm() {
        let result = authenticator("OTHER.ORG\\alice:hunter2", "EXAMPLE.ORG")
            .authenticate()
            .await;
        // FakeKdc only knows EXAMPLE.ORG
        assert!(matches!(result, Err(AuthError::CredentialInvalid(_))));
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let result = authenticator("alice:wrong", "EXAMPLE.ORG").authenticate().await;
        assert!(matches!(result, Err(AuthError::CredentialInvalid(_))));
    }

    #[tokio::test]
    async fn test_missing_realm_is_configuration_error() {
        let result = authenticator("alice:hunter2", "").authenticate().await;
        assert!(matches!(result, Err(AuthError::Configuration(_))));
    }
}
