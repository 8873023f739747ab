//! Token-service boundary
//!
//! One operation: assume a role with the federation user's own credential,
//! returning a temporary access key/secret/session-token triple. A zero or
//! unset duration means the token service's default; a policy override is
//! passed through unmodified (the token service is authoritative).

use async_trait::async_trait;
use aws_sdk_sts::config::{BehaviorVersion, Credentials, Region};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{GatewayError, Result};

/// Input to one role assumption
#[derive(Debug, Clone)]
pub struct AssumeRoleRequest {
    pub role_arn: String,
    pub session_name: String,
    pub policy: Option<String>,
    pub duration_seconds: Option<i32>,
    /// The federation user's long-lived credential
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Short-lived credential returned by the token service
#[derive(Debug, Clone, Serialize)]
pub struct TemporaryCredential {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: DateTime<Utc>,
    /// Assumed-role session identifier for audit records
    pub assumed_role_id: String,
}

/// The cloud token-service boundary
#[async_trait]
pub trait TokenService: Send + Sync {
    async fn assume_role(&self, request: AssumeRoleRequest) -> Result<TemporaryCredential>;
}

/// Token service backed by AWS STS
pub struct StsTokenService {
    region: String,
}

impl StsTokenService {
    pub fn new(region: impl Into<String>) -> Self {
        Self { region: region.into() }
    }
}

#[async_trait]
impl TokenService for StsTokenService {
    async fn assume_role(&self, request: AssumeRoleRequest) -> Result<TemporaryCredential> {
        // the call is signed by the federation user itself, so the client is
        // built per call from the stored credential
        let credentials = Credentials::new(
            request.access_key_id,
            request.secret_access_key,
            None,
            None,
            "federation-user",
        );
        let config = aws_sdk_sts::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .credentials_provider(credentials)
            .build();
        let client = aws_sdk_sts::Client::from_conf(config);

        debug!(
            role_arn = %request.role_arn,
            session_name = %request.session_name,
            duration = ?request.duration_seconds,
            "Calling STS assume-role"
        );

        let mut call = client
            .assume_role()
            .role_arn(&request.role_arn)
            .role_session_name(&request.session_name);
        if let Some(policy) = &request.policy {
            call = call.policy(policy);
        }
        if let Some(duration) = request.duration_seconds {
            if duration > 0 {
                call = call.duration_seconds(duration);
            }
        }

        let output = call.send().await.map_err(|err| {
            let message = format!("{}", aws_sdk_sts::error::DisplayErrorContext(&err));
            warn!(role_arn = %request.role_arn, error = %message, "STS assume-role failed");
            GatewayError::Upstream(message)
        })?;

        let credentials = output
            .credentials()
            .ok_or_else(|| GatewayError::Upstream("STS response carried no credentials".into()))?;
        let expiration = DateTime::from_timestamp(
            credentials.expiration().secs(),
            credentials.expiration().subsec_nanos(),
        )
        .unwrap_or_else(Utc::now);

        Ok(TemporaryCredential {
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: credentials.secret_access_key().to_string(),
            session_token: credentials.session_token().to_string(),
            expiration,
            assumed_role_id: output
                .assumed_role_user()
                .map(|user| user.assumed_role_id().to_string())
                .unwrap_or_default(),
        })
    }
}
