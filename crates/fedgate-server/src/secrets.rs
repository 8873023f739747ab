//! Secret store boundary
//!
//! Long-lived federation-user credentials live in an external key/value
//! secret store accessed by path, returning flat string maps (e.g.
//! `{"AccessKeyId": ..., "SecretAccessKey": ...}`). "Not found" is a
//! distinguished condition. No secret material is cached beyond a single
//! federation call.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::error::{GatewayError, Result};

/// Key/value secret store accessed by string path
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn read(&self, path: &str) -> Result<HashMap<String, String>>;

    async fn write(&self, path: &str, data: HashMap<String, String>) -> Result<()>;
}

/// Vault KV response envelope
#[derive(Deserialize)]
struct VaultSecret {
    data: HashMap<String, String>,
}

/// Secret store backed by a Vault-style HTTP KV API (v1)
pub struct VaultSecretStore {
    client: reqwest::Client,
    address: String,
    token: String,
}

impl VaultSecretStore {
    /// Build a client with a per-request timeout
    pub fn new(address: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Configuration(format!("secret store client: {}", e)))?;
        Ok(Self {
            client,
            address: address.into(),
            token: token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/v1/{}",
            self.address.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl SecretStore for VaultSecretStore {
    async fn read(&self, path: &str) -> Result<HashMap<String, String>> {
        debug!(path, "Reading secret");
        let response = self
            .client
            .get(self.url(path))
            .header("X-Vault-Token", &self.token)
            .send()
            .await
            .map_err(|e| GatewayError::Upstream(format!("secret store read: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(GatewayError::NotFound(format!("secret {}", path))),
            status if status.is_success() => {
                let secret: VaultSecret = response
                    .json()
                    .await
                    .map_err(|e| GatewayError::Upstream(format!("secret store decode: {}", e)))?;
                Ok(secret.data)
            }
            status => Err(GatewayError::Upstream(format!(
                "secret store read returned {}",
                status
            ))),
        }
    }

    async fn write(&self, path: &str, data: HashMap<String, String>) -> Result<()> {
        debug!(path, "Writing secret");
        let response = self
            .client
            .post(self.url(path))
            .header("X-Vault-Token", &self.token)
            .json(&data)
            .send()
            .await
            .map_err(|e| GatewayError::Upstream(format!("secret store write: {}", e)))?;

        if !response.status().is_success() {
            return Err(GatewayError::Upstream(format!(
                "secret store write returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// In-memory secret store for tests and development
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<String, HashMap<String, String>>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn read(&self, path: &str) -> Result<HashMap<String, String>> {
        let secrets = self.secrets.read().unwrap();
        secrets
            .get(path)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("secret {}", path)))
    }

    async fn write(&self, path: &str, data: HashMap<String, String>) -> Result<()> {
        let mut secrets = self.secrets.write().unwrap();
        secrets.insert(path.to_string(), data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemorySecretStore::new();
        let mut data = HashMap::new();
        data.insert("AccessKeyId".to_string(), "AKIA123".to_string());
        data.insert("SecretAccessKey".to_string(), "secret".to_string());

        store.write("fedgate/users/alice", data.clone()).await.unwrap();
        assert_eq!(store.read("fedgate/users/alice").await.unwrap(), data);
    }

    #[tokio::test]
    async fn test_memory_store_missing_is_not_found() {
        let store = MemorySecretStore::new();
        assert!(matches!(
            store.read("no/such/path").await,
            Err(GatewayError::NotFound(_))
        ));
    }

    #[test]
    fn test_vault_url_joins_cleanly() {
        let store =
            VaultSecretStore::new("http://vault:8200/", "tok", Duration::from_secs(5)).unwrap();
        assert_eq!(store.url("/secret/fedgate"), "http://vault:8200/v1/secret/fedgate");
        assert_eq!(store.url("secret/fedgate"), "http://vault:8200/v1/secret/fedgate");
    }
}
