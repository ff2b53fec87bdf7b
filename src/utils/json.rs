use serde_json::{Map, Value as JsonValue};

use crate::error::{Error, Result};

/// Parses a request body that must be a JSON object.
pub fn parse_object(body: &[u8]) -> Result<Map<String, JsonValue>> {
    match serde_json::from_slice::<JsonValue>(body) {
        Ok(JsonValue::Object(object)) => Ok(object),
        Ok(_) | Err(_) => Err(Error::InvalidJson),
    }
}
