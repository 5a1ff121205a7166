//! User access service
//!
//! Owns the store handle and exposes the CRUD operations over [`User`].
//! Every call round-trips to the store; nothing is cached and nothing is
//! retried.

use std::sync::Arc;

use crate::db::{codec, CodecError, ItemStore, StoreError, User, UserCodec};
use crate::services::ids::IdGenerator;

/// Errors from user operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Stored user could not be decoded: {0}")]
    Codec(#[from] CodecError),

    #[error("User id must be assigned before it is stored")]
    MissingId,
}

/// CRUD operations over the users table
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn ItemStore>,
    codec: UserCodec,
    ids: Arc<dyn IdGenerator>,
}

impl UserService {
    /// Create a new user service.
    ///
    /// # Arguments
    /// * `store` - Store executing table operations
    /// * `codec` - Codec bound to the users table
    /// * `ids` - Id source used by [`UserService::create`]
    pub fn new(store: Arc<dyn ItemStore>, codec: UserCodec, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, codec, ids }
    }

    pub fn table_name(&self) -> &str {
        self.codec.table_name()
    }

    pub fn store(&self) -> &Arc<dyn ItemStore> {
        &self.store
    }

    /// Every stored user, in store enumeration order
    pub async fn find_all(&self) -> Result<Vec<User>, UserServiceError> {
        let items = self.store.scan(self.codec.scan_descriptor()).await?;

        let users = items
            .iter()
            .map(|item| codec::decode(Some(item)))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    /// Store a user whose id is already assigned, overwriting any existing
    /// item with that id. Returns the id.
    pub async fn add(&self, user: &User) -> Result<String, UserServiceError> {
        let user_id = user.id().ok_or(UserServiceError::MissingId)?.to_string();

        self.store.put(self.codec.put_descriptor(user)).await?;

        tracing::debug!(user_id = %user_id, "Stored user");
        Ok(user_id)
    }

    /// Look up a user. A miss yields the empty user (see [`User::is_found`]).
    pub async fn get(&self, user_id: &str) -> Result<User, UserServiceError> {
        let item = self.store.get(self.codec.get_descriptor(user_id)).await?;
        let user = codec::decode(item.as_ref())?;

        tracing::debug!(user_id = %user_id, found = user.is_found(), "Fetched user");
        Ok(user)
    }

    /// Delete a user. Succeeds whether or not the id existed; returns the id.
    pub async fn delete(&self, user_id: &str) -> Result<String, UserServiceError> {
        self.store
            .delete(self.codec.delete_descriptor(user_id))
            .await?;

        tracing::debug!(user_id = %user_id, "Deleted user");
        Ok(user_id.to_string())
    }

    /// Create a user: assign a fresh id, store it and read back the stored
    /// record.
    pub async fn create(&self, mut user: User) -> Result<User, UserServiceError> {
        user.assign_id(self.ids.next_id());
        let user_id = self.add(&user).await?;

        tracing::info!(
            user_id = %user_id,
            user_name = %user.user_name,
            "Created user"
        );

        self.get(&user_id).await
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{memory_service, SequentialIds};
    use super::*;
    use crate::db::codec::{
        key, DeleteDescriptor, GetDescriptor, Item, PutDescriptor, ScanDescriptor, AGE,
    };
    use async_trait::async_trait;
    use aws_sdk_dynamodb::types::AttributeValue;
    use std::collections::HashSet;

    fn john(id: &str) -> User {
        User::new(id, "johndoe", "John", "Doe", 42)
    }

    #[tokio::test]
    async fn test_add_then_get() {
        let (service, _) = memory_service();

        let id = service.add(&john("u-1")).await.unwrap();
        assert_eq!(id, "u-1");

        let user = service.get("u-1").await.unwrap();
        assert_eq!(user, john("u-1"));
        assert_eq!(user.user_name, "johndoe");
        assert_eq!(user.first_name, "John");
        assert_eq!(user.last_name, "Doe");
        assert_eq!(user.age, 42);
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let (service, _) = memory_service();
        let user = service.get("never-written").await.unwrap();
        assert!(!user.is_found());
    }

    #[tokio::test]
    async fn test_add_requires_id() {
        let (service, store) = memory_service();

        let result = service.add(&User::default()).await;
        assert!(matches!(result, Err(UserServiceError::MissingId)));
        assert_eq!(store.len("Users").await, 0);
    }

    #[tokio::test]
    async fn test_add_overwrites_existing_id() {
        let (service, _) = memory_service();

        service.add(&john("u-1")).await.unwrap();
        service
            .add(&User::new("u-1", "jane", "Jane", "Roe", 30))
            .await
            .unwrap();

        let users = service.find_all().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].user_name, "jane");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (service, _) = memory_service();
        service.add(&john("u-1")).await.unwrap();

        assert_eq!(service.delete("u-1").await.unwrap(), "u-1");
        assert_eq!(service.delete("u-1").await.unwrap(), "u-1");
        assert!(!service.get("u-1").await.unwrap().is_found());
    }

    #[tokio::test]
    async fn test_find_all_returns_every_user() {
        let (service, _) = memory_service();
        let ids: HashSet<String> = (1..=5).map(|n| format!("u-{}", n)).collect();
        for id in &ids {
            service.add(&john(id)).await.unwrap();
        }

        let users = service.find_all().await.unwrap();
        assert_eq!(users.len(), 5);
        let found: HashSet<String> = users
            .iter()
            .filter_map(|u| u.id().map(str::to_string))
            .collect();
        assert_eq!(found, ids);
    }

    #[tokio::test]
    async fn test_find_all_empty_table() {
        let (service, _) = memory_service();
        assert!(service.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_ids() {
        let (service, _) = memory_service();

        let mut input = john("caller-chosen");
        input.user_id = None;
        let first = service.create(input.clone()).await.unwrap();
        let second = service.create(input).await.unwrap();

        assert_eq!(first.id(), Some("user-1"));
        assert_eq!(second.id(), Some("user-2"));
        assert_eq!(first.age, 42);
        assert_eq!(service.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_ignores_caller_id() {
        let (service, _) = memory_service();
        let created = service.create(john("spoofed")).await.unwrap();

        assert_eq!(created.id(), Some("user-1"));
        assert!(!service.get("spoofed").await.unwrap().is_found());
    }

    #[tokio::test]
    async fn test_corrupt_age_propagates() {
        let (service, store) = memory_service();
        let mut item = key("u-bad");
        item.insert(AGE.to_string(), AttributeValue::N("abc".to_string()));
        store.insert_raw("Users", item).await.unwrap();

        assert!(matches!(
            service.get("u-bad").await,
            Err(UserServiceError::Codec(CodecError::InvalidNumber { .. }))
        ));
        assert!(matches!(
            service.find_all().await,
            Err(UserServiceError::Codec(_))
        ));
    }

    /// Store that fails every call, standing in for throttling or access denial
    struct FailingStore;

    fn throttled() -> StoreError {
        StoreError::DynamoDb {
            operation: "Scan",
            message: "ProvisionedThroughputExceededException".to_string(),
        }
    }

    #[async_trait]
    impl ItemStore for FailingStore {
        async fn scan(&self, _: ScanDescriptor) -> Result<Vec<Item>, StoreError> {
            Err(throttled())
        }

        async fn put(&self, _: PutDescriptor) -> Result<(), StoreError> {
            Err(throttled())
        }

        async fn get(&self, _: GetDescriptor) -> Result<Option<Item>, StoreError> {
            Err(throttled())
        }

        async fn delete(&self, _: DeleteDescriptor) -> Result<(), StoreError> {
            Err(throttled())
        }

        fn backend_name(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_store_failures_propagate() {
        let service = UserService::new(
            Arc::new(FailingStore),
            UserCodec::default(),
            Arc::new(SequentialIds::default()),
        );

        assert!(matches!(
            service.find_all().await,
            Err(UserServiceError::Store(_))
        ));
        assert!(matches!(
            service.get("u-1").await,
            Err(UserServiceError::Store(_))
        ));
        assert!(matches!(
            service.add(&john("u-1")).await,
            Err(UserServiceError::Store(_))
        ));
        assert!(matches!(
            service.delete("u-1").await,
            Err(UserServiceError::Store(_))
        ));
        assert!(matches!(
            service.create(john("u-1")).await,
            Err(UserServiceError::Store(_))
        ));
    }
}
