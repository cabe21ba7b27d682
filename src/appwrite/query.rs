//! Appwrite query filters
//!
//! Appwrite 1.5+ accepts `queries[]` parameters as JSON objects:
//! `{"method":"equal","attribute":"userId","values":["abc"]}`.
//! Paging queries (`limit`, `cursorAfter`) carry no attribute.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<String>,
    values: Vec<Value>,
}

impl Query {
    /// `attribute == value`
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            method: "equal",
            attribute: Some(attribute.into()),
            values: vec![value.into()],
        }
    }

    /// Page size
    pub fn limit(limit: usize) -> Self {
        Self {
            method: "limit",
            attribute: None,
            values: vec![Value::from(limit)],
        }
    }

    /// Start after the document with this id
    pub fn cursor_after(document_id: impl Into<String>) -> Self {
        Self {
            method: "cursorAfter",
            attribute: None,
            values: vec![Value::String(document_id.into())],
        }
    }

    /// `Some(n)` for a `limit` query
    pub fn as_limit(&self) -> Option<usize> {
        match self.method {
            "limit" => self.values.first()?.as_u64().map(|n| n as usize),
            _ => None,
        }
    }

    /// `Some(id)` for a `cursorAfter` query
    pub fn as_cursor_after(&self) -> Option<&str> {
        match self.method {
            "cursorAfter" => self.values.first()?.as_str(),
            _ => None,
        }
    }

    /// True when `document` passes this filter. Paging queries pass every
    /// document. Used by the in-memory store; the REST client sends the
    /// query as-is.
    pub fn matches(&self, document: &Value) -> bool {
        match (self.method, &self.attribute) {
            ("equal", Some(attribute)) => document
                .get(attribute)
                .is_some_and(|field| self.values.iter().any(|v| v == field)),
            ("limit" | "cursorAfter", _) => true,
            _ => false,
        }
    }

    /// Wire form for the `queries[]` parameter
    pub fn to_param(&self) -> String {
        // Serializing a struct of strings and JSON values cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}
