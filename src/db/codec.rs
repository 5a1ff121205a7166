//! User item codec
//!
//! Converts between [`User`] and the DynamoDB attribute map stored in the
//! users table, and builds the request descriptors for the four table
//! operations. Everything here is pure; execution lives behind
//! [`ItemStore`](crate::db::ItemStore).

use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

use crate::db::models::User;

/// A stored item: attribute name to typed value
pub type Item = HashMap<String, AttributeValue>;

/// Partition key attribute
pub const USER_ID: &str = "userId";
pub const USER_NAME: &str = "userName";
pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
/// Numeric attribute
pub const AGE: &str = "age";

/// Every attribute the codec reads or writes, key first
pub const USER_ATTRIBUTES: [&str; 5] = [USER_ID, USER_NAME, FIRST_NAME, LAST_NAME, AGE];

/// Default table name
pub const DEFAULT_USERS_TABLE: &str = "Users";

/// Errors raised while decoding a stored item
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("attribute `{attribute}` is not a valid integer: {value:?}")]
    InvalidNumber { attribute: &'static str, value: String },

    #[error("attribute `{attribute}` has unexpected type, expected {expected}")]
    UnexpectedType {
        attribute: &'static str,
        expected: &'static str,
    },
}

/// Decode a stored item into a user.
///
/// An absent or empty item yields the empty "not found" user. Missing
/// attributes decode to empty/zero values.
pub fn decode(item: Option<&Item>) -> Result<User, CodecError> {
    let Some(item) = item.filter(|item| !item.is_empty()) else {
        return Ok(User::default());
    };

    Ok(User {
        user_id: get_string(item, USER_ID)?,
        user_name: get_string(item, USER_NAME)?.unwrap_or_default(),
        first_name: get_string(item, FIRST_NAME)?.unwrap_or_default(),
        last_name: get_string(item, LAST_NAME)?.unwrap_or_default(),
        age: get_number(item, AGE)?.unwrap_or_default(),
    })
}

/// Encode a user as a stored item. All five attributes are always written.
pub fn encode(user: &User) -> Item {
    let mut item = HashMap::new();
    item.insert(
        USER_ID.to_string(),
        AttributeValue::S(user.user_id.clone().unwrap_or_default()),
    );
    item.insert(USER_NAME.to_string(), AttributeValue::S(user.user_name.clone()));
    item.insert(FIRST_NAME.to_string(), AttributeValue::S(user.first_name.clone()));
    item.insert(LAST_NAME.to_string(), AttributeValue::S(user.last_name.clone()));
    item.insert(AGE.to_string(), AttributeValue::N(user.age.to_string()));
    item
}

/// Primary key item for a user id
pub fn key(user_id: &str) -> Item {
    HashMap::from([(USER_ID.to_string(), AttributeValue::S(user_id.to_string()))])
}

/// Full-table scan restricted to the user attributes
#[derive(Debug, Clone, PartialEq)]
pub struct ScanDescriptor {
    pub table_name: String,
    pub projection: Vec<&'static str>,
}

/// Unconditional upsert of one item
#[derive(Debug, Clone, PartialEq)]
pub struct PutDescriptor {
    pub table_name: String,
    pub item: Item,
}

/// Single-item read by key
#[derive(Debug, Clone, PartialEq)]
pub struct GetDescriptor {
    pub table_name: String,
    pub key: Item,
    pub projection: Vec<&'static str>,
}

/// Unconditional single-item delete by key
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteDescriptor {
    pub table_name: String,
    pub key: Item,
}

/// Builds request descriptors against one users table
#[derive(Debug, Clone)]
pub struct UserCodec {
    table_name: String,
}

impl UserCodec {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn scan_descriptor(&self) -> ScanDescriptor {
        ScanDescriptor {
            table_name: self.table_name.clone(),
            projection: USER_ATTRIBUTES.to_vec(),
        }
    }

    pub fn put_descriptor(&self, user: &User) -> PutDescriptor {
        PutDescriptor {
            table_name: self.table_name.clone(),
            item: encode(user),
        }
    }

    pub fn get_descriptor(&self, user_id: &str) -> GetDescriptor {
        GetDescriptor {
            table_name: self.table_name.clone(),
            key: key(user_id),
            projection: USER_ATTRIBUTES.to_vec(),
        }
    }

    pub fn delete_descriptor(&self, user_id: &str) -> DeleteDescriptor {
        DeleteDescriptor {
            table_name: self.table_name.clone(),
            key: key(user_id),
        }
    }
}

impl Default for UserCodec {
    fn default() -> Self {
        Self::new(DEFAULT_USERS_TABLE)
    }
}

/// Render a projection as a DynamoDB `ProjectionExpression`.
///
/// Names go through `#placeholders` so none of them can clash with a
/// reserved word.
pub fn projection_expression(attributes: &[&str]) -> (String, HashMap<String, String>) {
    let names: HashMap<String, String> = attributes
        .iter()
        .map(|attr| (format!("#{}", attr), attr.to_string()))
        .collect();
    let expression = attributes
        .iter()
        .map(|attr| format!("#{}", attr))
        .collect::<Vec<_>>()
        .join(", ");
    (expression, names)
}

// Attribute readers. `Ok(None)` means the attribute is absent.

fn get_string(item: &Item, key: &'static str) -> Result<Option<String>, CodecError> {
    match item.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_s()
            .map(|s| Some(s.to_string()))
            .map_err(|_| CodecError::UnexpectedType {
                attribute: key,
                expected: "S",
            }),
    }
}

fn get_number(item: &Item, key: &'static str) -> Result<Option<i32>, CodecError> {
    let Some(value) = item.get(key) else {
        return Ok(None);
    };
    let raw = value.as_n().map_err(|_| CodecError::UnexpectedType {
        attribute: key,
        expected: "N",
    })?;
    raw.parse()
        .map(Some)
        .map_err(|_| CodecError::InvalidNumber {
            attribute: key,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn john() -> User {
        User::new("u-1", "johndoe", "John", "Doe", 42)
    }

    #[test]
    fn test_round_trip_preserves_every_field() {
        let user = john();
        let decoded = decode(Some(&encode(&user))).unwrap();

        assert_eq!(decoded.user_id, user.user_id);
        assert_eq!(decoded.user_name, user.user_name);
        assert_eq!(decoded.first_name, user.first_name);
        assert_eq!(decoded.last_name, user.last_name);
        assert_eq!(decoded.age, user.age);
    }

    #[test]
    fn test_age_encoded_as_number() {
        let item = encode(&john());
        assert_eq!(item.get(AGE).unwrap().as_n().unwrap(), "42");

        let negative = User::new("u-2", "x", "y", "z", -3);
        assert_eq!(encode(&negative).get(AGE).unwrap().as_n().unwrap(), "-3");
    }

    #[test]
    fn test_encode_writes_exactly_five_attributes() {
        let item = encode(&john());
        assert_eq!(item.len(), 5);
        for attr in USER_ATTRIBUTES {
            assert!(item.contains_key(attr), "missing {}", attr);
        }
        assert_eq!(item.get(USER_ID).unwrap().as_s().unwrap(), "u-1");
        assert_eq!(item.get(USER_NAME).unwrap().as_s().unwrap(), "johndoe");
    }

    #[test]
    fn test_decode_absent_or_empty_item() {
        assert!(!decode(None).unwrap().is_found());
        assert!(!decode(Some(&Item::new())).unwrap().is_found());
    }

    #[test]
    fn test_decode_numeric_string() {
        let mut item = encode(&john());
        item.insert(AGE.to_string(), AttributeValue::N("42".to_string()));
        assert_eq!(decode(Some(&item)).unwrap().age, 42);
    }

    #[test]
    fn test_decode_missing_attributes_default() {
        let item = key("u-9");
        let user = decode(Some(&item)).unwrap();

        assert_eq!(user.id(), Some("u-9"));
        assert_eq!(user.user_name, "");
        assert_eq!(user.age, 0);
    }

    #[test]
    fn test_decode_invalid_age_fails() {
        let mut item = encode(&john());
        item.insert(AGE.to_string(), AttributeValue::N("4.2e1x".to_string()));

        assert_eq!(
            decode(Some(&item)).unwrap_err(),
            CodecError::InvalidNumber {
                attribute: AGE,
                value: "4.2e1x".to_string()
            }
        );
    }

    #[test]
    fn test_decode_wrong_attribute_type_fails() {
        let mut item = encode(&john());
        item.insert(AGE.to_string(), AttributeValue::S("42".to_string()));

        assert!(matches!(
            decode(Some(&item)),
            Err(CodecError::UnexpectedType { attribute: AGE, .. })
        ));
    }

    #[test]
    fn test_descriptors_target_table_and_key() {
        let codec = UserCodec::new("Users");

        let scan = codec.scan_descriptor();
        assert_eq!(scan.table_name, "Users");
        assert_eq!(scan.projection, USER_ATTRIBUTES.to_vec());

        let get = codec.get_descriptor("u-1");
        assert_eq!(get.key, key("u-1"));
        assert_eq!(get.projection.len(), 5);

        let delete = codec.delete_descriptor("u-1");
        assert_eq!(delete.key.len(), 1);
        assert_eq!(delete.key.get(USER_ID).unwrap().as_s().unwrap(), "u-1");

        let put = codec.put_descriptor(&john());
        assert_eq!(put.item, encode(&john()));
    }

    #[test]
    fn test_projection_expression_uses_placeholders() {
        let (expression, names) = projection_expression(&[USER_ID, AGE]);
        assert_eq!(expression, "#userId, #age");
        assert_eq!(names.get("#age").map(String::as_str), Some("age"));
        assert_eq!(names.len(), 2);
    }
}
