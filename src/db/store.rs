//! Item store abstraction
//!
//! Executes the request descriptors built by the codec. Implemented by the
//! DynamoDB client wrapper and by the in-process store.

use async_trait::async_trait;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::display::DisplayErrorContext;
use std::error::Error as StdError;
use std::fmt::Debug;

use crate::db::codec::{DeleteDescriptor, GetDescriptor, Item, PutDescriptor, ScanDescriptor};

/// Errors returned by a store. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("DynamoDB {operation} failed: {message}")]
    DynamoDb {
        operation: &'static str,
        message: String,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl StoreError {
    /// Wrap an SDK error, keeping its whole source chain in the message
    pub fn from_sdk<E, R>(operation: &'static str, err: SdkError<E, R>) -> Self
    where
        E: StdError + 'static,
        R: Debug,
    {
        StoreError::DynamoDb {
            operation,
            message: DisplayErrorContext(&err).to_string(),
        }
    }
}

/// A key-value store holding user items
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Return every item in the table. Implementations follow pagination
    /// until the result set is complete.
    async fn scan(&self, request: ScanDescriptor) -> Result<Vec<Item>, StoreError>;

    async fn put(&self, request: PutDescriptor) -> Result<(), StoreError>;

    /// `Ok(None)` when no item has the key
    async fn get(&self, request: GetDescriptor) -> Result<Option<Item>, StoreError>;

    async fn delete(&self, request: DeleteDescriptor) -> Result<(), StoreError>;

    /// Cheap connectivity probe used by the readiness endpoint
    async fn health_check(&self) -> bool {
        true
    }

    /// Short backend name for logs and health output
    fn backend_name(&self) -> &'static str;
}
