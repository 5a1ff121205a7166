//! Services module
//!
//! Business logic over the user store.

pub mod ids;
pub mod users;

pub use ids::{IdGenerator, UuidGenerator};
pub use users::{UserService, UserServiceError};
