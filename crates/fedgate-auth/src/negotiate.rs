//! Negotiate (SPNEGO/Kerberos) mechanism
//!
//! Validates a base64 SPNEGO service-ticket token against the service
//! keytab. Keytab and ticket handling belong to the Kerberos machinery
//! behind [`TicketValidator`]; this module owns the mechanism contract and
//! identity construction.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use fedgate_core::Identity;

use crate::authenticator::Authenticator;
use crate::error::{AuthError, Result};

/// Client principal extracted from a validated service ticket
#[derive(Debug, Clone)]
pub struct TicketIdentity {
    /// Principal name without the realm, e.g. `alice`
    pub principal: String,
    /// Kerberos realm, e.g. `EXAMPLE.ORG`
    pub realm: String,
    /// Display name from the ticket's authorization data, when present
    pub display_name: Option<String>,
}

/// Validates SPNEGO tokens against the configured service keytab.
///
/// The concrete implementation wraps the deployment's GSSAPI/keytab
/// machinery; a rejected ticket is `AuthError::CredentialInvalid`, keytab or
/// KDC trouble is `AuthError::Upstream`.
#[async_trait]
pub trait TicketValidator: Send + Sync {
    async fn validate(&self, token: &[u8]) -> Result<TicketIdentity>;
}

/// The Negotiate mechanism variant
pub struct NegotiateAuthenticator {
    token: String,
    validator: Arc<dyn TicketValidator>,
}

impl NegotiateAuthenticator {
    pub fn new(token: String, validator: Arc<dyn TicketValidator>) -> Self {
        Self { token, validator }
    }
}

#[async_trait]
impl Authenticator for NegotiateAuthenticator {
    fn mechanism(&self) -> &str {
        "Negotiate/Kerberos"
    }

    async fn authenticate(&self) -> Result<Identity> {
        let token = STANDARD
            .decode(self.token.trim())
            .map_err(|e| AuthError::Malformed(format!("negotiate token is not base64: {}", e)))?;

        let ticket = self.validator.validate(&token).await?;

        let mut identity = Identity::new(ticket.principal, ticket.realm);
        if let Some(display_name) = ticket.display_name {
            identity = identity.with_display_name(display_name);
        }
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticValidator {
        accept: &'static str,
    }

    #[async_trait]
    impl TicketValidator for StaticValidator {
        async fn validate(&self, token: &[u8]) -> Result<TicketIdentity> {
            if token == self.accept.as_bytes() {
                Ok(TicketIdentity {
                    principal: "alice".into(),
                    realm: "EXAMPLE.ORG".into(),
                    display_name: Some("Alice Example".into()),
                })
            } else {
                Err(AuthError::CredentialInvalid("ticket rejected".into()))
            }
        }
    }

    fn authenticator(token: &str) -> NegotiateAuthenticator {
        NegotiateAuthenticator::new(
            STANDARD.encode(token),
            Arc::new(StaticValidator { accept: "good-ticket" }),
        )
    }

    #[tokio::test]
    async fn test_valid_ticket_builds_identity() {
        let identity = authenticator("good-ticket").authenticate().await.unwrap();
        assert_eq!(identity.username(), "alice");
        assert_eq!(identity.domain(), "EXAMPLE.ORG");
        assert_eq!(identity.display_name(), "Alice Example");
        assert!(identity.human());
        assert!(!identity.session_id().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_ticket_is_credential_invalid() {
        let result = authenticator("forged-ticket").authenticate().await;
        assert!(matches!(result, Err(AuthError::CredentialInvalid(_))));
    }

    #[tokio::test]
    async fn test_non_base64_token_is_malformed() {
        let authenticator = NegotiateAuthenticator::new(
            "%%%not-base64%%%".into(),
            Arc::new(StaticValidator { accept: "good-ticket" }),
        );
        assert!(matches!(
            authenticator.authenticate().await,
            Err(AuthError::Malformed(_))
        ));
    }
}
