//! Response body decoding
//!
//! Single-resource endpoints yield one [`Resource`]; collection endpoints yield
//! either a bare JSON array or a paginated `{"items": [...]}` envelope.

use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::resource::{json_type_name, Resource};

/// Whether a `Content-Type` header value denotes a JSON body.
///
/// Matches any media type whose subtype ends in `json` on a word boundary,
/// e.g. `application/json` or `application/problem+json`. Parameters such as
/// `charset` are ignored.
pub(crate) fn is_json_content_type(value: &str) -> bool {
    let essence = value.split(';').next().unwrap_or("").trim();
    let essence = essence.to_ascii_lowercase();
    match essence.strip_suffix("json") {
        Some(prefix) => prefix
            .chars()
            .last()
            .map_or(true, |c| !(c.is_ascii_alphanumeric() || c == '_')),
        None => false,
    }
}

/// Decode a single-resource response body.
///
/// An empty body (e.g. a 204) or a body that is not JSON decodes to an empty
/// [`Resource`].
pub fn decode_resource(body: &[u8], json: bool) -> Result<Resource> {
    if is_blank(body) {
        return Ok(Resource::new());
    }
    if !json {
        debug!(len = body.len(), "Ignoring non-JSON response body");
        return Ok(Resource::new());
    }

    match parse(body)? {
        Value::Object(map) => Ok(Resource::from(map)),
        Value::Null => Ok(Resource::new()),
        Value::Array(items) if items.is_empty() => Ok(Resource::new()),
        other => Err(ClientError::Decode(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Decode a collection response body.
///
/// Element order follows the server. An element that is an empty array is
/// kept as an empty [`Resource`] so indices line up with the server output.
pub fn decode_collection(body: &[u8], json: bool) -> Result<Vec<Resource>> {
    if is_blank(body) {
        return Err(ClientError::Decode(
            "expected a JSON collection, got an empty body".to_string(),
        ));
    }
    if !json {
        return Err(ClientError::Decode(
            "expected a JSON collection, got a non-JSON body".to_string(),
        ));
    }

    let items = match parse(body)? {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ClientError::Decode(format!(
                    "expected `items` to be an array, got {}",
                    json_type_name(&other)
                )))
            }
            None => {
                return Err(ClientError::Decode(
                    "collection object has no `items` field".to_string(),
                ))
            }
        },
        other => {
            return Err(ClientError::Decode(format!(
                "expected a JSON array or object, got {}",
                json_type_name(&other)
            )))
        }
    };

    items.into_iter().map(collection_element).collect()
}

fn collection_element(value: Value) -> Result<Resource> {
    match value {
        Value::Array(items) if items.is_empty() => Ok(Resource::new()),
        other => Resource::try_from(other),
    }
}

/// Normalize the `tags` field of a user record to an array of strings.
///
/// Brokers before 3.9 return a comma-separated string, later ones an array.
pub(crate) fn normalize_user_tags(mut user: Resource) -> Resource {
    let tags: Vec<Value> = match user.get("tags") {
        Some(Value::String(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| Value::String(t.to_string()))
            .collect(),
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    };
    user.insert("tags", Value::Array(tags));
    user
}

fn parse(body: &[u8]) -> Result<Value> {
    serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()))
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}
