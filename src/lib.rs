//! User service library
//!
//! CRUD over a DynamoDB users table, served as a REST API and as AWS Lambda
//! handlers.

// Public modules
pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod server;
pub mod services;

// Re-export commonly used types
pub use config::Settings;
pub use db::User;
pub use error::ApiError;
pub use server::App;
pub use services::UserService;
