//! Schema-less records decoded from management API responses
//!
//! The shape of most payloads varies with the broker version and the set of
//! enabled plugins, so responses are kept as JSON objects and read by key.

use std::ops::Index;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClientError;

static NULL: Value = Value::Null;

/// A single JSON object returned by the server.
///
/// Fields are accessed by name with typed helpers; missing fields and type
/// mismatches both yield `None`.
///
/// ```
/// use rabbitmq_http_client::Resource;
///
/// let r: Resource = serde_json::from_str(r#"{"name": "orders", "messages": 3}"#).unwrap();
/// assert_eq!(r.str("name"), Some("orders"));
/// assert_eq!(r.u64("messages"), Some(3));
/// assert!(r["missing"].is_null());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(Map<String, Value>);

impl Resource {
    /// An empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of a field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    pub fn i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Nested object field
    pub fn resource(&self, key: &str) -> Option<Resource> {
        match self.get(key)? {
            Value::Object(map) => Some(Resource(map.clone())),
            _ => None,
        }
    }

    /// Array-of-objects field. Non-object elements are skipped.
    pub fn resources(&self, key: &str) -> Option<Vec<Resource>> {
        let items = self.get(key)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|v| v.as_object().cloned().map(Resource))
                .collect(),
        )
    }

    /// Array-of-strings field. Non-string elements are skipped.
    pub fn strings(&self, key: &str) -> Option<Vec<String>> {
        let items = self.get(key)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect(),
        )
    }

    /// Look up a nested value by JSON pointer, e.g. `"/message_stats/publish"`.
    pub fn pointer(&self, path: &str) -> Option<&Value> {
        let path = path.strip_prefix('/')?;
        let (first, rest) = match path.find('/') {
            Some(at) => path.split_at(at),
            None => (path, ""),
        };
        self.0.get(unescape_pointer(first).as_str())?.pointer(rest)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }
}

fn unescape_pointer(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

impl Index<&str> for Resource {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.0.get(key).unwrap_or(&NULL)
    }
}

impl From<Map<String, Value>> for Resource {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Resource {
    type Error = ClientError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ClientError::Decode(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

impl From<Resource> for Value {
    fn from(resource: Resource) -> Self {
        resource.into_value()
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
