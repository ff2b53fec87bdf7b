use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};
use validator::Validate;

use crate::error::{Error, Result};
use crate::models::user::User;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateUserPayload {
    #[validate(length(max = 254))]
    pub email: String,
    #[validate(length(max = 150))]
    pub username: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
}

impl CreateUserPayload {
    /// Checked in this order; the first one missing is reported.
    pub const REQUIRED_FIELDS: [&'static str; 2] = ["email", "username"];

    pub fn from_object(object: Map<String, JsonValue>) -> Result<Self> {
        for field in Self::REQUIRED_FIELDS {
            if !object.contains_key(field) {
                return Err(Error::MissingField(field));
            }
        }
        let payload: Self = serde_json::from_value(JsonValue::Object(object))?;
        payload.validate()?;
        Ok(payload)
    }
}

/// Sparse update: an absent key is `None` and leaves the stored value
/// untouched. A key sent as `null` is rejected, since no column is nullable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateUserPayload {
    #[serde(deserialize_with = "present")]
    #[validate(length(max = 254))]
    pub email: Option<String>,
    #[serde(deserialize_with = "present")]
    #[validate(length(max = 150))]
    pub username: Option<String>,
    #[serde(deserialize_with = "present")]
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "present")]
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "present")]
    pub is_active: Option<bool>,
}

/// Only called for keys that are in the body, so `null` fails like any
/// other wrong type instead of collapsing to `None`.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl UpdateUserPayload {
    pub fn from_object(object: Map<String, JsonValue>) -> Result<Self> {
        let payload: Self = serde_json::from_value(JsonValue::Object(object))?;
        payload.validate()?;
        Ok(payload)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            email: value.email,
            username: value.username,
            first_name: value.first_name,
            last_name: value.last_name,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<Vec<User>> for UserListResponse {
    fn from(value: Vec<User>) -> Self {
        Self {
            users: value.into_iter().map(Into::into).collect(),
        }
    }
}
