//! Database module
//!
//! User entity, its DynamoDB item codec and the stores that execute it.

pub mod codec;
pub mod dynamodb;
pub mod memory;
pub mod models;
pub mod store;

pub use codec::{CodecError, Item, UserCodec};
pub use dynamodb::DynamoDbClient;
pub use memory::InMemoryStore;
pub use models::User;
pub use store::{ItemStore, StoreError};
