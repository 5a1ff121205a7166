//! Application state container
//!
//! This module defines the shared application state that is passed
//! to all request handlers via Axum's state extraction.

use std::sync::Arc;
use std::time::Instant;

use crate::config::{create_dynamodb_client, Settings, StoreBackend};
use crate::db::{DynamoDbClient, InMemoryStore, ItemStore, UserCodec};
use crate::services::{UserService, UuidGenerator};

/// Shared application state
///
/// Built once at process start and cloned cheaply into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Application settings
    pub settings: Arc<Settings>,

    /// User access service, owner of the store handle
    pub users: Arc<UserService>,

    /// Application start time (for uptime calculation)
    pub start_time: Instant,
}

impl AppState {
    /// Create a new application state, connecting the configured store
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        let store = build_store(&settings).await;
        let users = UserService::new(
            store,
            UserCodec::new(settings.users_table.clone()),
            Arc::new(UuidGenerator),
        );

        tracing::info!(
            store = %settings.store_backend,
            table = %settings.users_table,
            "Application state initialized successfully"
        );

        Ok(Self::from_parts(settings, users))
    }

    /// Assemble state from an already built service
    pub fn from_parts(settings: Settings, users: UserService) -> Self {
        Self {
            settings: Arc::new(settings),
            users: Arc::new(users),
            start_time: Instant::now(),
        }
    }

    /// Get the application uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Build the item store selected in settings
pub async fn build_store(settings: &Settings) -> Arc<dyn ItemStore> {
    match settings.store_backend {
        StoreBackend::DynamoDb => {
            tracing::debug!(
                region = %settings.aws_region,
                dynamodb_endpoint = ?settings.dynamodb_endpoint_url,
                "Creating DynamoDB client"
            );
            let client = create_dynamodb_client(settings).await;
            Arc::new(DynamoDbClient::new(client, settings.users_table.clone()))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, users are lost on restart");
            Arc::new(InMemoryStore::new())
        }
    }
}
