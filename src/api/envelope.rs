//! Response envelope normalisation.
//!
//! List endpoints answer with a bare array, `{ <resource>: [...] }`, `{ data: [...] }`
//! or `{ data: { <resource>: [...] } }`. Single-document endpoints do the same with
//! objects. Everything is unwrapped here, once, so resource code never inspects shapes.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, Result};

/// Locates the payload for `key` inside any of the known envelope shapes.
fn locate<'a>(body: &'a Value, key: &str) -> Option<&'a Value> {
    match body {
        Value::Object(map) => {
            if let Some(found) = map.get(key).filter(|v| !v.is_null()) {
                return Some(found);
            }
            match map.get("data") {
                Some(Value::Object(inner)) if inner.contains_key(key) => {
                    inner.get(key).filter(|v| !v.is_null())
                }
                Some(data) if !data.is_null() => Some(data),
                _ => None,
            }
        }
        Value::Null => None,
        other => Some(other),
    }
}

/// Normalises a list response into `Vec<T>`.
///
/// A body with no payload at all (null, or an object carrying neither `key` nor
/// `data`) is an empty list. A payload that is present but not an array is an error.
pub fn list_from<T: DeserializeOwned>(body: Value, key: &str) -> Result<Vec<T>> {
    let Some(payload) = locate(&body, key) else {
        debug!(key, "list response carried no payload, treating as empty");
        return Ok(Vec::new());
    };

    match payload {
        Value::Array(_) => serde_json::from_value(payload.clone())
            .map_err(|err| ClientError::Decode(format!("{key}: {err}"))),
        other => Err(ClientError::Decode(format!(
            "{key}: expected a list, got {}",
            kind_of(other)
        ))),
    }
}

/// Normalises a single-document response. `None` when the body carries no document.
pub fn item_from<T: DeserializeOwned>(body: Value, key: &str) -> Result<Option<T>> {
    let payload = match &body {
        Value::Object(map) if map.contains_key(key) || map.contains_key("data") => {
            match locate(&body, key) {
                Some(payload) => payload.clone(),
                None => return Ok(None),
            }
        }
        // Documents always carry an id; `{ message: "created" }` is not one.
        Value::Object(map) if !map.contains_key("_id") && !map.contains_key("id") => {
            debug!(key, "response carried no document");
            return Ok(None);
        }
        Value::Object(_) => body.clone(),
        Value::Null => return Ok(None),
        other => {
            return Err(ClientError::Decode(format!(
                "{key}: expected an object, got {}",
                kind_of(other)
            )))
        }
    };

    serde_json::from_value(payload)
        .map(Some)
        .map_err(|err| ClientError::Decode(format!("{key}: {err}")))
}

/// Like [`item_from`] but a missing document is an error.
pub fn require_item<T: DeserializeOwned>(body: Value, key: &str) -> Result<T> {
    item_from(body, key)?.ok_or_else(|| ClientError::Decode(format!("{key}: missing from response")))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
