//! Request-side types shared by client operations

use serde::Serialize;

/// Query string parameters passed through to list and delete endpoints.
///
/// Pairs are sent in insertion order and are not interpreted by the client.
///
/// ```
/// use rabbitmq_http_client::QueryParams;
///
/// let q = QueryParams::new().page(2).page_size(50).name("orders");
/// assert_eq!(q.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an arbitrary parameter
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.0.push((name.into(), value.to_string()));
        self
    }

    /// 1-based page number for paginated listings
    pub fn page(self, page: u32) -> Self {
        self.param("page", page)
    }

    pub fn page_size(self, size: u32) -> Self {
        self.param("page_size", size)
    }

    /// Filter listings by name
    pub fn name(self, pattern: impl Into<String>) -> Self {
        self.param("name", pattern.into())
    }

    /// Interpret the `name` filter as a regular expression
    pub fn use_regex(self, enabled: bool) -> Self {
        self.param("use_regex", enabled)
    }

    /// Restrict returned fields, e.g. `"name,messages"`
    pub fn columns(self, columns: impl Into<String>) -> Self {
        self.param("columns", columns.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        )
    }
}

/// Conditions for deleting a queue or exchange
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteConditions {
    /// Only delete when there are no consumers (queues) or bindings (exchanges)
    pub if_unused: bool,
    /// Only delete when the queue holds no messages
    pub if_empty: bool,
}

impl DeleteConditions {
    pub fn if_unused() -> Self {
        Self {
            if_unused: true,
            if_empty: false,
        }
    }

    pub fn if_empty() -> Self {
        Self {
            if_unused: false,
            if_empty: true,
        }
    }

    pub(crate) fn to_query(self) -> QueryParams {
        let mut query = QueryParams::new();
        if self.if_unused {
            query = query.param("if-unused", true);
        }
        if self.if_empty {
            query = query.param("if-empty", true);
        }
        query
    }
}
