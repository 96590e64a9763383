//! Scalar/type matching
//!
//! Pure predicates over document values: which runtime kind a value has and
//! whether it satisfies a JSON-schema primitive type name.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Runtime kind of a document value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Object => "object",
            NodeKind::Array => "array",
            NodeKind::String => "string",
            NodeKind::Number => "number",
            NodeKind::Boolean => "boolean",
            NodeKind::Null => "null",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Determine the runtime kind of a value
pub fn kind_of(value: &Value) -> NodeKind {
    match value {
        Value::Object(_) => NodeKind::Object,
        Value::Array(_) => NodeKind::Array,
        Value::String(_) => NodeKind::String,
        Value::Number(_) => NodeKind::Number,
        Value::Bool(_) => NodeKind::Boolean,
        Value::Null => NodeKind::Null,
    }
}

/// JSON-schema primitive type name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

impl JsonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonType::Object => "object",
            JsonType::Array => "array",
            JsonType::String => "string",
            JsonType::Number => "number",
            JsonType::Integer => "integer",
            JsonType::Boolean => "boolean",
            JsonType::Null => "null",
        }
    }

    /// Does `value` satisfy this primitive type
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            JsonType::Object => value.is_object(),
            JsonType::Array => value.is_array(),
            JsonType::String => value.is_string(),
            JsonType::Number => value.is_number(),
            JsonType::Integer => is_integer(value),
            JsonType::Boolean => value.is_boolean(),
            JsonType::Null => value.is_null(),
        }
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().map(|f| f.fract() == 0.0).unwrap_or(false)
        }
        _ => false,
    }
}

/// One primitive type name or a set of alternatives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonTypes {
    One(JsonType),
    AnyOf(Vec<JsonType>),
}

impl JsonTypes {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            JsonTypes::One(t) => t.matches(value),
            JsonTypes::AnyOf(ts) => ts.iter().any(|t| t.matches(value)),
        }
    }
}

impl From<JsonType> for JsonTypes {
    fn from(t: JsonType) -> Self {
        JsonTypes::One(t)
    }
}

impl fmt::Display for JsonTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonTypes::One(t) => f.write_str(t.as_str()),
            JsonTypes::AnyOf(ts) => {
                let names: Vec<&str> = ts.iter().map(|t| t.as_str()).collect();
                f.write_str(&names.join(","))
            }
        }
    }
}

/// Does `value` match the declared primitive type name(s)
pub fn matches_json_type(value: &Value, types: &JsonTypes) -> bool {
    types.matches(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_of() {
        assert_eq!(kind_of(&json!({})), NodeKind::Object);
        assert_eq!(kind_of(&json!([1])), NodeKind::Array);
        assert_eq!(kind_of(&json!("x")), NodeKind::String);
        assert_eq!(kind_of(&json!(1.5)), NodeKind::Number);
        assert_eq!(kind_of(&json!(true)), NodeKind::Boolean);
        assert_eq!(kind_of(&Value::Null), NodeKind::Null);
    }

    #[test]
    fn test_integer_matching() {
        let int = JsonTypes::One(JsonType::Integer);
        assert!(matches_json_type(&json!(3), &int));
        assert!(matches_json_type(&json!(3.0), &int));
        assert!(!matches_json_type(&json!(3.5), &int));
        assert!(!matches_json_type(&json!("3"), &int));
    }

    #[test]
    fn test_any_of_display_and_match() {
        let types = JsonTypes::AnyOf(vec![JsonType::String, JsonType::Boolean]);
        assert!(types.matches(&json!(false)));
        assert!(!types.matches(&json!(1)));
        assert_eq!(types.to_string(), "string,boolean");
    }
}
