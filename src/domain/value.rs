// ============================================================
// ATTRIBUTE VALUES
// ============================================================
// Typed stand-in for free-form JSON blobs (client attributes,
// rule parameters). Parsing is a fallible boundary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<AttributeValue>),
    Map(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Parse a JSON document into an attribute value
    pub fn parse_json(raw: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| AppError::ParseError(format!("Invalid JSON: {}", e)))?;
        Ok(Self::from(value))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// `true` for a list whose items are all numbers greater than zero.
    /// An empty list qualifies.
    pub fn is_positive_number_list(&self) -> bool {
        self.as_list().is_some_and(|items| {
            items
                .iter()
                .all(|item| item.as_f64().is_some_and(|n| n > 0.0))
        })
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => AttributeValue::Null,
            serde_json::Value::Bool(b) => AttributeValue::Bool(b),
            // serde_json numbers always fit an f64 unless arbitrary precision is enabled
            serde_json::Value::Number(n) => AttributeValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => AttributeValue::String(s),
            serde_json::Value::Array(items) => {
                AttributeValue::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => AttributeValue::Map(
                map.into_iter().map(|(k, v)| (k, Self::from(v))).collect(),
            ),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        AttributeValue::Number(n)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}
