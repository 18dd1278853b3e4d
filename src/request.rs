//! Read-only request snapshot consumed by the evaluator.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A read-only view of one incoming request.
///
/// The surrounding server builds one snapshot per request; evaluation only
/// ever reads it, so snapshots can be shared freely across concurrent
/// evaluations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSnapshot {
    /// Raw body, as delivered
    #[serde(default)]
    pub body: String,

    /// Request headers, single-valued
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Query parameters; nested structures allowed
    #[serde(default = "empty_object")]
    pub query: Value,

    /// Route parameters, flat
    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

impl Default for RequestSnapshot {
    fn default() -> Self {
        Self {
            body: String::new(),
            headers: HashMap::new(),
            query: empty_object(),
            params: HashMap::new(),
        }
    }
}

impl RequestSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter.
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Value::Object(map) = &mut self.query {
            map.insert(name.into(), value.into());
        }
        self
    }

    /// Add a route parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Look up a header by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
