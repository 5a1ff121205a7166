//! In-process item store
//!
//! Keeps items in memory with the same put/get/delete/scan semantics as the
//! DynamoDB table: unconditional upserts, no-op deletes of missing keys and
//! attribute projection on reads. Used for local development and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::db::codec::{
    DeleteDescriptor, GetDescriptor, Item, PutDescriptor, ScanDescriptor, USER_ID,
};
use crate::db::store::{ItemStore, StoreError};

/// Tables keyed by name, each holding items keyed by partition key value
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, HashMap<String, Item>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items in a table
    pub async fn len(&self, table_name: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table_name)
            .map_or(0, HashMap::len)
    }

    /// Insert a raw item, bypassing the codec
    pub async fn insert_raw(&self, table_name: &str, item: Item) -> Result<(), StoreError> {
        let key = partition_key(&item)?;
        self.tables
            .write()
            .await
            .entry(table_name.to_string())
            .or_default()
            .insert(key, item);
        Ok(())
    }
}

#[async_trait]
impl ItemStore for InMemoryStore {
    async fn scan(&self, request: ScanDescriptor) -> Result<Vec<Item>, StoreError> {
        let tables = self.tables.read().await;
        let items = tables
            .get(&request.table_name)
            .map(|table| {
                table
                    .values()
                    .map(|item| project(item, &request.projection))
                    .collect()
            })
            .unwrap_or_default();
        Ok(items)
    }

    async fn put(&self, request: PutDescriptor) -> Result<(), StoreError> {
        self.insert_raw(&request.table_name, request.item).await
    }

    async fn get(&self, request: GetDescriptor) -> Result<Option<Item>, StoreError> {
        let key = partition_key(&request.key)?;
        let tables = self.tables.read().await;
        Ok(tables
            .get(&request.table_name)
            .and_then(|table| table.get(&key))
            .map(|item| project(item, &request.projection)))
    }

    async fn delete(&self, request: DeleteDescriptor) -> Result<(), StoreError> {
        let key = partition_key(&request.key)?;
        if let Some(table) = self.tables.write().await.get_mut(&request.table_name) {
            table.remove(&key);
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

fn partition_key(item: &Item) -> Result<String, StoreError> {
    let key = item
        .get(USER_ID)
        .and_then(|v| v.as_s().ok())
        .ok_or_else(|| {
            StoreError::InvalidRequest(format!("missing string key attribute `{}`", USER_ID))
        })?;

    // DynamoDB rejects empty string key values
    if key.is_empty() {
        return Err(StoreError::InvalidRequest(format!(
            "key attribute `{}` must not be empty",
            USER_ID
        )));
    }
    Ok(key.clone())
}

fn project(item: &Item, projection: &[&str]) -> Item {
    item.iter()
        .filter(|(name, _)| projection.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::codec::{key, UserCodec};
    use crate::db::models::User;
    use aws_sdk_dynamodb::types::AttributeValue;

    #[tokio::test]
    async fn test_put_overwrites_same_key() {
        let store = InMemoryStore::new();
        let codec = UserCodec::default();

        store
            .put(codec.put_descriptor(&User::new("u-1", "first", "A", "B", 1)))
            .await
            .unwrap();
        store
            .put(codec.put_descriptor(&User::new("u-1", "second", "C", "D", 2)))
            .await
            .unwrap();

        assert_eq!(store.len("Users").await, 1);
        let item = store.get(codec.get_descriptor("u-1")).await.unwrap().unwrap();
        assert_eq!(item.get("userName").unwrap().as_s().unwrap(), "second");
    }

    #[tokio::test]
    async fn test_get_applies_projection() {
        let store = InMemoryStore::new();
        let mut item = key("u-1");
        item.insert("extra".to_string(), AttributeValue::S("hidden".to_string()));
        store.insert_raw("Users", item).await.unwrap();

        let codec = UserCodec::default();
        let fetched = store.get(codec.get_descriptor("u-1")).await.unwrap().unwrap();
        assert!(fetched.contains_key("userId"));
        assert!(!fetched.contains_key("extra"));
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_noop() {
        let store = InMemoryStore::new();
        let codec = UserCodec::default();

        store.delete(codec.delete_descriptor("nope")).await.unwrap();
        assert_eq!(store.len("Users").await, 0);
    }

    #[tokio::test]
    async fn test_tables_are_isolated() {
        let store = InMemoryStore::new();
        store.insert_raw("Users", key("u-1")).await.unwrap();

        let other = UserCodec::new("OtherUsers");
        assert!(store.scan(other.scan_descriptor()).await.unwrap().is_empty());
        assert!(store.get(other.get_descriptor("u-1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejects_empty_key() {
        let store = InMemoryStore::new();
        let codec = UserCodec::default();

        let result = store.put(codec.put_descriptor(&User::default())).await;
        assert!(matches!(result, Err(StoreError::InvalidRequest(_))));
    }
}
