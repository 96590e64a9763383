//! Reference resolution
//!
//! Resolves local `$ref` pointers (`#/components/schemas/Pet`) against the
//! already-parsed root document. Chained references are followed until a
//! non-reference node is reached. Cycles and external references resolve to
//! no node plus an error message; they never recurse.

use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

use crate::location::{unescape_pointer, Key, Location};

/// Does `value` have the shape of a reference pointer (`{"$ref": "..."}`)
pub fn is_ref(value: &Value) -> bool {
    ref_target(value).is_some()
}

/// Target string of a reference pointer
pub fn ref_target(value: &Value) -> Option<&str> {
    value.as_object()?.get("$ref")?.as_str()
}

/// Outcome of resolving a value
#[derive(Debug, Clone)]
pub struct Resolved<'a> {
    /// Target node, `None` when the reference cannot be followed
    pub node: Option<&'a Value>,
    /// Location of the target; `None` when `value` was not a reference
    pub location: Option<Location>,
    pub error: Option<String>,
}

/// In-document resolver over one root value
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    root: &'a Value,
    source: Arc<str>,
}

impl<'a> Resolver<'a> {
    pub fn new(root: &'a Value, source: impl Into<Arc<str>>) -> Self {
        Self {
            root,
            source: source.into(),
        }
    }

    pub fn root(&self) -> &'a Value {
        self.root
    }

    pub fn source(&self) -> &Arc<str> {
        &self.source
    }

    /// Resolve `value`, following `$ref` chains
    ///
    /// Non-reference values resolve to themselves.
    pub fn resolve(&self, value: &'a Value) -> Resolved<'a> {
        let mut current = value;
        let mut location = None;
        let mut seen: HashSet<&str> = HashSet::new();

        while let Some(target) = ref_target(current) {
            if !seen.insert(target) {
                return Self::failed(format!("Reference cycle detected at '{}'", target));
            }
            let Some(pointer) = parse_local_pointer(target) else {
                return Self::failed(format!("Can't resolve external reference '{}'", target));
            };
            match lookup(self.root, &pointer) {
                Some(next) => {
                    current = next;
                    location = Some(Location {
                        source: self.source.clone(),
                        pointer,
                        report_on_key: false,
                    });
                }
                None => return Self::failed(format!("Can't resolve $ref '{}'", target)),
            }
        }

        Resolved {
            node: Some(current),
            location,
            error: None,
        }
    }

    fn failed(message: String) -> Resolved<'a> {
        Resolved {
            node: None,
            location: None,
            error: Some(message),
        }
    }
}

/// Split a local `#/a/b` pointer into keys; `None` for non-local pointers
pub fn parse_local_pointer(target: &str) -> Option<Vec<Key>> {
    let rest = target.strip_prefix('#')?;
    if rest.is_empty() {
        return Some(Vec::new());
    }
    let rest = rest.strip_prefix('/')?;
    Some(
        rest.split('/')
            .map(|segment| Key::Prop(unescape_pointer(segment)))
            .collect(),
    )
}

fn lookup<'a>(root: &'a Value, pointer: &[Key]) -> Option<&'a Value> {
    pointer.iter().try_fold(root, |node, key| {
        let segment = match key {
            Key::Prop(p) => p.as_str(),
            Key::Index(i) => return node.as_array()?.get(*i),
        };
        match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_ref() {
        assert!(is_ref(&json!({ "$ref": "#/a" })));
        assert!(!is_ref(&json!({ "$ref": 1 })));
        assert!(!is_ref(&json!("#/a")));
    }

    #[test]
    fn test_resolve_chain() {
        let doc = json!({
            "components": {
                "schemas": {
                    "A": { "$ref": "#/components/schemas/B" },
                    "B": { "type": "string" }
                }
            }
        });
        let resolver = Resolver::new(&doc, "doc.json");
        let value = json!({ "$ref": "#/components/schemas/A" });
        let resolved = resolver.resolve(&value);
        assert_eq!(resolved.node, Some(&json!({ "type": "string" })));
        assert_eq!(
            resolved.location.unwrap().pointer_string(),
            "#/components/schemas/B"
        );
    }

    #[test]
    fn test_resolve_cycle_fails_gracefully() {
        let doc = json!({
            "a": { "$ref": "#/b" },
            "b": { "$ref": "#/a" }
        });
        let resolver = Resolver::new(&doc, "doc.json");
        let value = json!({ "$ref": "#/a" });
        let resolved = resolver.resolve(&value);
        assert!(resolved.node.is_none());
        assert!(resolved.error.unwrap().contains("cycle"));
    }

    #[test]
    fn test_external_and_missing() {
        let doc = json!({ "list": ["x", "y"] });
        let resolver = Resolver::new(&doc, "doc.json");

        let external = json!({ "$ref": "other.yaml#/a" });
        assert!(resolver.resolve(&external).node.is_none());

        let missing = json!({ "$ref": "#/nope" });
        assert!(resolver.resolve(&missing).node.is_none());

        let indexed = json!({ "$ref": "#/list/1" });
        assert_eq!(resolver.resolve(&indexed).node, Some(&json!("y")));
    }

    #[test]
    fn test_non_ref_resolves_to_itself() {
        let doc = json!({});
        let resolver = Resolver::new(&doc, "doc.json");
        let value = json!("plain");
        let resolved = resolver.resolve(&value);
        assert_eq!(resolved.node, Some(&value));
        assert!(resolved.location.is_none());
    }
}
