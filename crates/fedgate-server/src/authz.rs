//! Role-mapping authorization
//!
//! Decides whether an identity may use a role mapping and resolves the
//! mapping's federation parameters. The mapping identifier must be a
//! syntactically valid UUID before storage is touched; attribute comparison
//! is exact-string and case-sensitive, any match suffices, and no positive
//! result is ever cached.

use std::sync::Arc;

use fedgate_core::Identity;
use tracing::debug;
use uuid::Uuid;

use crate::error::{GatewayError, Result};
use crate::storage::MappingStore;

/// Federation parameters resolved from a role mapping, verbatim from the
/// stored record
#[derive(Debug, Clone)]
pub struct FederationParams {
    pub role_arn: String,
    pub federation_user_arn: String,
    pub duration_seconds: Option<i32>,
    pub policy: Option<String>,
    pub session_name_template: Option<String>,
}

/// Authorization resolver over the mapping store
#[derive(Clone)]
pub struct Authorizer {
    store: Arc<dyn MappingStore>,
}

impl Authorizer {
    pub fn new(store: Arc<dyn MappingStore>) -> Self {
        Self { store }
    }

    fn parse_id(mapping_id: &str) -> Result<Uuid> {
        Uuid::parse_str(mapping_id)
            .map_err(|_| GatewayError::MalformedInput(format!("invalid role mapping id: {}", mapping_id)))
    }

    /// Whether the identity holds any attribute permitted for the mapping.
    ///
    /// `Ok(false)` when the mapping exists but no attribute matches; errors
    /// only for a malformed id, a missing mapping, or a storage failure.
    pub async fn authorize(&self, identity: &Identity, mapping_id: &str) -> Result<bool> {
        let id = Self::parse_id(mapping_id)?;
        let mapping = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| GatewayError::NotFound(format!("role mapping {}", id)))?;

        let allowed = mapping
            .required_attributes
            .iter()
            .any(|attribute| identity.has_attribute(attribute));

        debug!(
            mapping_id = %id,
            username = identity.username(),
            allowed,
            "Authorization decision"
        );
        Ok(allowed)
    }

    /// Resolve the mapping's federation parameter tuple
    pub async fn resolve(&self, mapping_id: &str) -> Result<FederationParams> {
        let id = Self::parse_id(mapping_id)?;
        let mapping = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| GatewayError::NotFound(format!("role mapping {}", id)))?;

        Ok(FederationParams {
            role_arn: mapping.role_arn,
            federation_user_arn: mapping.federation_user_arn,
            duration_seconds: mapping.duration_seconds,
            policy: mapping.policy,
            session_name_template: mapping.session_name_template,
        })
    }
}
