//! DynamoDB client wrapper
//!
//! Runs user table descriptors against DynamoDB through the AWS SDK.

use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoDbSdkClient;

use crate::db::codec::{
    projection_expression, DeleteDescriptor, GetDescriptor, Item, PutDescriptor, ScanDescriptor,
};
use crate::db::store::{ItemStore, StoreError};

/// DynamoDB-backed [`ItemStore`].
///
/// Cheap to clone; the SDK client is reference counted internally.
#[derive(Clone)]
pub struct DynamoDbClient {
    /// AWS DynamoDB SDK client
    client: DynamoDbSdkClient,

    /// Table probed by the health check
    users_table: String,
}

impl DynamoDbClient {
    /// Create a new DynamoDB client.
    ///
    /// # Arguments
    /// * `client` - AWS DynamoDB SDK client
    /// * `users_table` - Table the service reads and writes
    pub fn new(client: DynamoDbSdkClient, users_table: impl Into<String>) -> Self {
        Self {
            client,
            users_table: users_table.into(),
        }
    }
}

#[async_trait]
impl ItemStore for DynamoDbClient {
    async fn scan(&self, request: ScanDescriptor) -> Result<Vec<Item>, StoreError> {
        let (expression, names) = projection_expression(&request.projection);

        // The paginator follows LastEvaluatedKey until the table is exhausted
        let items: Vec<Item> = self
            .client
            .scan()
            .table_name(&request.table_name)
            .projection_expression(expression)
            .set_expression_attribute_names(Some(names))
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .map_err(|e| StoreError::from_sdk("Scan", e))?;

        tracing::debug!(
            table = %request.table_name,
            count = items.len(),
            "Scanned table"
        );

        Ok(items)
    }

    async fn put(&self, request: PutDescriptor) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&request.table_name)
            .set_item(Some(request.item))
            .send()
            .await
            .map_err(|e| StoreError::from_sdk("PutItem", e))?;

        Ok(())
    }

    async fn get(&self, request: GetDescriptor) -> Result<Option<Item>, StoreError> {
        let (expression, names) = projection_expression(&request.projection);

        let result = self
            .client
            .get_item()
            .table_name(&request.table_name)
            .set_key(Some(request.key))
            .projection_expression(expression)
            .set_expression_attribute_names(Some(names))
            .send()
            .await
            .map_err(|e| StoreError::from_sdk("GetItem", e))?;

        Ok(result.item)
    }

    async fn delete(&self, request: DeleteDescriptor) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&request.table_name)
            .set_key(Some(request.key))
            .send()
            .await
            .map_err(|e| StoreError::from_sdk("DeleteItem", e))?;

        Ok(())
    }

    /// Check if the DynamoDB connection is healthy
    ///
    /// Describes the users table, which also verifies it exists.
    async fn health_check(&self) -> bool {
        match self
            .client
            .describe_table()
            .table_name(&self.users_table)
            .send()
            .await
        {
            Ok(_) => {
                tracing::debug!("DynamoDB health check passed");
                true
            }
            Err(e) => {
                tracing::warn!(
                    error = %StoreError::from_sdk("DescribeTable", e),
                    "DynamoDB health check failed"
                );
                false
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "dynamodb"
    }
}
