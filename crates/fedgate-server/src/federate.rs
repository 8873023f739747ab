//! Credential federation
//!
//! The top of the federation pipeline: authorize the identity against the
//! role mapping, resolve federation parameters, load the federation user's
//! long-lived credential from the secret store, compute the role session
//! name, call the token service, and emit exactly one audit record whatever
//! the outcome.

use std::collections::HashMap;
use std::sync::Arc;

use fedgate_core::{AuditDetail, AuditEvent, Identity};
use tracing::info;

use crate::audit::AuditRecorder;
use crate::authz::Authorizer;
use crate::error::{GatewayError, Result};
use crate::secrets::SecretStore;
use crate::sts::{AssumeRoleRequest, TemporaryCredential, TokenService};

/// Secret-map key for the federation user's access key id
const KEY_ACCESS_KEY_ID: &str = "AccessKeyId";
/// Secret-map key for the federation user's secret access key
const KEY_SECRET_ACCESS_KEY: &str = "SecretAccessKey";

/// Orchestrates one federation attempt end to end
pub struct FederationService {
    authorizer: Authorizer,
    secrets: Arc<dyn SecretStore>,
    token_service: Arc<dyn TokenService>,
    audit: AuditRecorder,
    /// Template applied when the mapping carries none
    default_session_name_template: String,
    /// Secret-store path prefix for federation-user credentials
    secret_path_prefix: String,
}

impl FederationService {
    pub fn new(
        authorizer: Authorizer,
        secrets: Arc<dyn SecretStore>,
        token_service: Arc<dyn TokenService>,
        audit: AuditRecorder,
        default_session_name_template: impl Into<String>,
        secret_path_prefix: impl Into<String>,
    ) -> Self {
        Self {
            authorizer,
            secrets,
            token_service,
            audit,
            default_session_name_template: default_session_name_template.into(),
            secret_path_prefix: secret_path_prefix.into(),
        }
    }

    fn secret_path(&self, federation_user_arn: &str) -> String {
        format!(
            "{}/{}",
            self.secret_path_prefix.trim_end_matches('/'),
            federation_user_arn
        )
    }

    /// Exchange the identity's authorization for a temporary credential.
    ///
    /// Exactly one federation audit record is emitted per call, success or
    /// failure; failure records carry placeholders for fields that never
    /// resolved and the failing error message as the comment.
    pub async fn federate(
        &self,
        identity: &Identity,
        mapping_id: &str,
    ) -> Result<TemporaryCredential> {
        let mut detail = AuditDetail::failure(mapping_id, "");
        let result = self.run(identity, mapping_id, &mut detail).await;
        if let Err(err) = &result {
            detail.successful = false;
            detail.comment = err.to_string();
        }
        self.audit.record(identity, AuditEvent::Federation, &detail);
        result
    }

    async fn run(
        &self,
        identity: &Identity,
        mapping_id: &str,
        detail: &mut AuditDetail,
    ) -> Result<TemporaryCredential> {
        if !self.authorizer.authorize(identity, mapping_id).await? {
            return Err(GatewayError::Forbidden(format!(
                "{}@{} holds no attribute permitted for mapping {}",
                identity.username(),
                identity.domain(),
                mapping_id
            )));
        }

        let params = self.authorizer.resolve(mapping_id).await?;
        detail.role_arn = params.role_arn.clone();
        detail.federation_user_arn = params.federation_user_arn.clone();
        detail.session_duration = params.duration_seconds.unwrap_or(0);

        let template = params
            .session_name_template
            .as_deref()
            .unwrap_or(&self.default_session_name_template);
        let session_name = identity.render_session_name(template);
        detail.session_name = session_name.clone();

        let secret = self
            .secrets
            .read(&self.secret_path(&params.federation_user_arn))
            .await?;
        let (access_key_id, secret_access_key) = extract_credential(&secret)?;

        let credential = self
            .token_service
            .assume_role(AssumeRoleRequest {
                role_arn: params.role_arn.clone(),
                session_name: session_name.clone(),
                policy: params.policy,
                duration_seconds: params.duration_seconds,
                access_key_id,
                secret_access_key,
            })
            .await?;

        info!(
            username = identity.username(),
            role_arn = %params.role_arn,
            session_name = %session_name,
            assumed_role_id = %credential.assumed_role_id,
            "Federation succeeded"
        );
        detail.successful = true;
        detail.comment = format!("assumed role session {}", credential.assumed_role_id);
        Ok(credential)
    }
}

fn extract_credential(secret: &HashMap<String, String>) -> Result<(String, String)> {
    let access_key_id = secret
        .get(KEY_ACCESS_KEY_ID)
        .ok_or_else(|| GatewayError::Upstream(format!("federation user secret missing {}", KEY_ACCESS_KEY_ID)))?;
    let secret_access_key = secret
        .get(KEY_SECRET_ACCESS_KEY)
        .ok_or_else(|| {
            GatewayError::Upstream(format!("federation user secret missing {}", KEY_SECRET_ACCESS_KEY))
        })?;
    Ok((access_key_id.clone(), secret_access_key.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_credential_requires_both_keys() {
        let mut secret = HashMap::new();
        secret.insert(KEY_ACCESS_KEY_ID.to_string(), "AKIA123".to_string());
        assert!(extract_credential(&secret).is_err());

        secret.insert(KEY_SECRET_ACCESS_KEY.to_string(), "shh".to_string());
        let (ak, sk) = extract_credential(&secret).unwrap();
        assert_eq!(ak, "AKIA123");
        assert_eq!(sk, "shh");
    }
}
