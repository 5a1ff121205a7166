//! User entity
//!
//! The record stored in the users table, one item per user.

use serde::{Deserialize, Deserializer, Serialize};
use std::hash::{Hash, Hasher};

/// A user record.
///
/// Identity is carried by `user_id` alone: two users with the same id are
/// equal no matter what the other fields hold. A user without an id is the
/// "not found" value returned when a lookup misses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    /// Partition key, assigned once on creation
    pub user_id: Option<String>,

    /// Login name
    pub user_name: String,

    pub first_name: String,

    pub last_name: String,

    /// Accepted as a JSON integer or as a quoted decimal integer
    #[serde(deserialize_with = "deserialize_age")]
    pub age: i32,
}

impl User {
    /// Create a fully populated user
    pub fn new(
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        age: i32,
    ) -> Self {
        Self {
            user_id: Some(user_id.into()),
            user_name: user_name.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
        }
    }

    /// The user's id, if one has been assigned and is non-empty
    pub fn id(&self) -> Option<&str> {
        self.user_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Whether this value denotes a stored record rather than a lookup miss
    pub fn is_found(&self) -> bool {
        self.id().is_some()
    }

    /// Set the id, replacing any caller-supplied value
    pub fn assign_id(&mut self, user_id: impl Into<String>) {
        self.user_id = Some(user_id.into());
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AgeRepr {
    Number(i32),
    Text(String),
}

fn deserialize_age<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    match AgeRepr::deserialize(deserializer)? {
        AgeRepr::Number(age) => Ok(age),
        AgeRepr::Text(text) => text.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("age must be an integer, got {:?}", text))
        }),
    }
}
