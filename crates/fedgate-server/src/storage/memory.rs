//! In-memory role-mapping store
//!
//! Default backend for development and single-instance deployments.
//! Mappings are lost on restart.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use super::{MappingStore, RoleMapping, StorageError};

/// In-memory mapping store implementation
#[derive(Debug, Default)]
pub struct MemoryMappingStore {
    mappings: RwLock<HashMap<Uuid, RoleMapping>>,
}

impl MemoryMappingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MappingStore for MemoryMappingStore {
    async fn get(&self, id: Uuid) -> Result<Option<RoleMapping>, StorageError> {
        let mappings = self.mappings.read().unwrap();
        Ok(mappings.get(&id).cloned())
    }

    async fn put(&self, mapping: RoleMapping) -> Result<(), StorageError> {
        let mut mappings = self.mappings.write().unwrap();
        info!(id = %mapping.id, role_arn = %mapping.role_arn, "Storing role mapping");
        mappings.insert(mapping.id, mapping);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let mut mappings = self.mappings.write().unwrap();
        let removed = mappings.remove(&id).is_some();
        if removed {
            info!(id = %id, "Deleted role mapping");
        }
        Ok(removed)
    }

    async fn list(&self) -> Result<Vec<RoleMapping>, StorageError> {
        let mappings = self.mappings.read().unwrap();
        Ok(mappings.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> RoleMapping {
        RoleMapping {
            id: Uuid::new_v4(),
            role_arn: "arn:aws:iam::123456789012:role/MyRole".into(),
            required_attributes: vec!["admins".into()],
            account_id: "123456789012".into(),
            federation_user_arn: "arn:aws:iam::123456789012:user/federation".into(),
            policy: None,
            duration_seconds: Some(3600),
            session_name_template: None,
        }
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryMappingStore::new();
        let m = mapping();
        let id = m.id;

        store.put(m).await.unwrap();
        assert!(store.get(id).await.unwrap().is_some());
        assert_eq!(store.list().await.unwrap().len(), 1);

        assert!(store.delete(id).await.unwrap());
        assert!(store.get(id).await.unwrap().is_none());
        assert!(!store.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_unknown_is_none() {
        let store = MemoryMappingStore::new();
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }
}
