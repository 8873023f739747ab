//! Role-mapping storage
//!
//! Trait-based abstraction over the persisted role-mapping records, with an
//! in-memory default and a PostgreSQL backend behind the `postgres` feature.
//! The federation core only reads mappings; create/update/delete belong to
//! the administrative surface and tests.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryMappingStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresMappingStore;

use async_trait::async_trait;
use fedgate_core::Arn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GatewayError;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("role mapping not found: {0}")]
    NotFound(String),

    #[error("role mapping already exists: {0}")]
    AlreadyExists(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("connection error: {0}")]
    Connection(String),
}

/// A persisted authorization rule binding authorization attributes to a
/// target IAM role and its federation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleMapping {
    /// Globally unique identifier
    pub id: Uuid,
    /// Target role ARN; must parse as a role ARN in `account_id`
    pub role_arn: String,
    /// Authorization attributes permitted to assume the role (any match
    /// suffices)
    pub required_attributes: Vec<String>,
    /// Owning account identifier (12 digits)
    pub account_id: String,
    /// Federation user whose stored credential performs the exchange
    pub federation_user_arn: String,
    /// Optional policy-document override, passed to the token service
    /// unmodified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    /// Optional session duration override in seconds; 0/None means the
    /// token service default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i32>,
    /// Optional session-name template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_name_template: Option<String>,
}

impl RoleMapping {
    /// Check the record's invariants: the target must parse as an IAM role
    /// ARN belonging to the stated account.
    pub fn validate(&self) -> Result<(), GatewayError> {
        let arn = Arn::parse(&self.role_arn)?;
        if !arn.is_role() {
            return Err(GatewayError::MalformedInput(format!(
                "{} is not an IAM role ARN",
                self.role_arn
            )));
        }
        if !arn.account_matches(&self.account_id) {
            return Err(GatewayError::MalformedInput(format!(
                "role {} does not belong to account {}",
                self.role_arn, self.account_id
            )));
        }
        Ok(())
    }
}

/// Role-mapping persistence boundary
#[async_trait]
pub trait MappingStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<RoleMapping>, StorageError>;

    async fn put(&self, mapping: RoleMapping) -> Result<(), StorageError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;

    async fn list(&self) -> Result<Vec<RoleMapping>, StorageError>;
}
