//! Static-Secret Basic mechanism
//!
//! Authenticates when the supplied password equals a single configured
//! shared secret and grants exactly one configured authorization attribute.
//! Integration-testing use only; production configurations leave it
//! unconfigured and the dispatch then fails with a configuration error.

use async_trait::async_trait;
use fedgate_core::{BasicCredentials, Identity};

use crate::authenticator::Authenticator;
use crate::config::StaticSecretConfig;
use crate::error::{AuthError, Result};

/// The static shared-secret mechanism variant
pub struct StaticBasicAuthenticator {
    credential: String,
    config: StaticSecretConfig,
}

impl StaticBasicAuthenticator {
    pub fn new(credential: String, config: StaticSecretConfig) -> Self {
        Self { credential, config }
    }
}

#[async_trait]
impl Authenticator for StaticBasicAuthenticator {
    fn mechanism(&self) -> &str {
        "static secret basic"
    }

    async fn authenticate(&self) -> Result<Identity> {
        let creds = BasicCredentials::parse(&self.credential)?;

        if creds.password != self.config.secret {
            return Err(AuthError::CredentialInvalid(format!(
                "static secret mismatch for {}",
                creds.username
            )));
        }

        let domain = if creds.domain.is_empty() {
            self.config.realm.clone()
        } else {
            creds.domain
        };

        Ok(Identity::new(creds.username, domain)
            .with_attributes([self.config.attribute.clone()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine};

    fn authenticator(raw: &str) -> StaticBasicAuthenticator {
        StaticBasicAuthenticator::new(
            STANDARD.encode(raw),
            StaticSecretConfig {
                secret: "integration-secret".into(),
                attribute: "testers".into(),
                realm: "TEST".into(),
            },
        )
    }

    #[tokio::test]
    async fn test_matching_secret_grants_single_attribute() {
        let identity = authenticator("alice:integration-secret").authenticate().await.unwrap();
        assert_eq!(identity.username(), "alice");
        assert_eq!(identity.domain(), "TEST");
        assert_eq!(identity.attributes().len(), 1);
        assert!(identity.has_attribute("testers"));
    }

    #[tokio::test]
    async fn test_wrong_secret_rejected() {
        let result = authenticator("alice:not-the-secret").authenticate().await;
        assert!(matches!(result, Err(AuthError::CredentialInvalid(_))));
    }
}
