//! OpenAPI version detection
//!
//! The version context selects both the root type tree and the
//! version-specific configuration overrides.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{LintError, Result};

/// Major document version a lint run is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OasVersion {
    /// Swagger 2.0
    Oas2,
    /// OpenAPI 3.0.x
    Oas3,
}

impl OasVersion {
    /// Detect the version from a parsed document root
    pub fn detect(root: &Value) -> Result<Self> {
        let Some(obj) = root.as_object() else {
            return Err(LintError::UnknownVersion(
                "document root is not an object".to_string(),
            ));
        };

        if let Some(openapi) = obj.get("openapi") {
            let v = version_string(openapi);
            return if v.starts_with("3.0") {
                Ok(Self::Oas3)
            } else {
                Err(LintError::UnknownVersion(format!(
                    "unsupported OpenAPI version '{}'",
                    v
                )))
            };
        }

        if let Some(swagger) = obj.get("swagger") {
            let v = version_string(swagger);
            return if v.starts_with('2') {
                Ok(Self::Oas2)
            } else {
                Err(LintError::UnknownVersion(format!(
                    "unsupported Swagger version '{}'",
                    v
                )))
            };
        }

        Err(LintError::UnknownVersion(
            "missing 'openapi' or 'swagger' field".to_string(),
        ))
    }
}

// `swagger: 2.0` parses as a YAML float, so accept numbers too
fn version_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

impl fmt::Display for OasVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OasVersion::Oas2 => write!(f, "oas2"),
            OasVersion::Oas3 => write!(f, "oas3"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect_oas3() {
        let doc = json!({ "openapi": "3.0.2" });
        assert_eq!(OasVersion::detect(&doc).unwrap(), OasVersion::Oas3);
    }

    #[test]
    fn test_detect_swagger_as_number() {
        let doc = json!({ "swagger": 2.0 });
        assert_eq!(OasVersion::detect(&doc).unwrap(), OasVersion::Oas2);
    }

    #[test]
    fn test_unsupported_versions() {
        assert!(OasVersion::detect(&json!({ "openapi": "3.1.0" })).is_err());
        assert!(OasVersion::detect(&json!({ "info": {} })).is_err());
        assert!(OasVersion::detect(&json!([])).is_err());
    }
}
