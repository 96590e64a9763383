//! Structural Validation
//!
//! Checks a node against the type the walker bound to it: shape (object or
//! array), required fields, unexpected properties, and the scalar constraints
//! of every property declared with a [`ScalarSchema`].
//!
//! Properties whose effective schema is a named type are skipped here. The
//! walker binds that type when it descends into the value and runs this
//! validator again there, so each node is validated exactly once and
//! recursion follows the document, never the (possibly cyclic) type graph.

use serde_json::{Map, Value};
use std::borrow::Cow;

use super::{Diagnostic, VisitContext, Visitor};
use crate::config::RuleSettings;
use crate::error::{LintError, Result};
use crate::location::Location;
use crate::matcher::{kind_of, NodeKind};
use crate::resolve::is_ref;
use crate::suggest::{get_suggest, suggest_str};
use crate::types::{NodeType, PropSchema, ScalarSchema};

/// Rule id the validator is registered under
pub const RULE_ID: &str = "spec";

/// Unknown properties with this prefix are vendor extensions
pub const EXTENSION_PREFIX: &str = "x-";

/// The always-registered structural rule
#[derive(Debug, Clone, Default)]
pub struct StructureValidator;

impl StructureValidator {
    /// Rule constructor; the validator takes no options
    pub fn build(settings: &RuleSettings) -> Result<Box<dyn Visitor>> {
        if let Some(option) = settings.options.keys().next() {
            return Err(LintError::configuration(
                RULE_ID,
                format!("unexpected option '{}'", option),
            ));
        }
        Ok(Box::new(StructureValidator))
    }

    fn check_object<'d>(&self, map: &'d Map<String, Value>, ctx: &mut VisitContext<'_, 'd>) {
        let node_type = ctx.node_type;

        if let Some(required) = &node_type.required {
            for name in required.resolve(map, ctx.key) {
                if !map.contains_key(name) {
                    ctx.report(Diagnostic::new(
                        format!("The field '{}' must be present on this level.", name),
                        ctx.location.key(),
                    ));
                }
            }
        }

        for (name, value) in map {
            let prop_location = ctx.location.child([name.as_str()]);
            let effective = node_type
                .property(name)
                .and_then(|slot| slot.resolve(value, name));

            match effective.as_deref() {
                // validated when the walker descends into the value
                Some(PropSchema::Named(_)) => continue,
                Some(PropSchema::Unchecked) => continue,
                None => {
                    if !name.starts_with(EXTENSION_PREFIX) {
                        report_unexpected(node_type, name, prop_location, ctx);
                    }
                }
                Some(PropSchema::Scalar(schema)) => {
                    self.check_scalar(name, value, schema, prop_location, ctx);
                }
            }
        }
    }

    fn check_scalar<'d>(
        &self,
        name: &str,
        value: &'d Value,
        schema: &ScalarSchema,
        location: Location,
        ctx: &mut VisitContext<'_, 'd>,
    ) {
        let mut value = value;
        if schema.referenceable && is_ref(value) {
            let resolved = ctx.resolve(value);
            match resolved.node {
                Some(target) => value = target,
                None => {
                    let message = resolved
                        .error
                        .unwrap_or_else(|| format!("Can't resolve reference in '{}'", name));
                    ctx.report(Diagnostic::new(message, location));
                    return;
                }
            }
        }

        // a declared enum excludes the other checks; items run unless the
        // declared type already failed
        let type_mismatch = schema
            .type_
            .as_ref()
            .filter(|expected| !expected.matches(value));

        if let Some(allowed) = &schema.enum_ {
            if !allowed.contains(value) {
                let listed: Vec<String> = allowed.iter().map(|v| format!("\"{}\"", literal(v))).collect();
                let variants: Vec<Cow<'_, str>> = allowed.iter().map(literal).collect();
                ctx.report(
                    Diagnostic::new(
                        format!("'{}' can be one of following only: {}", name, listed.join(", ")),
                        location,
                    )
                    .with_suggest(get_suggest(value, &variants)),
                );
            }
        } else if let Some(expected) = type_mismatch {
            ctx.report(Diagnostic::new(
                format!("Expected type '{}' but got '{}'", expected, kind_of(value)),
                location,
            ));
        } else if let (Value::Array(items), Some(item_type)) = (value, &schema.items) {
            for (i, item) in items.iter().enumerate() {
                if !item_type.matches(item) {
                    ctx.report(Diagnostic::new(
                        format!("Expected type '{}' but got '{}'", item_type, kind_of(item)),
                        location.child([i]),
                    ));
                }
            }
        }
    }
}

impl Visitor for StructureValidator {
    fn enter<'d>(&self, node: &'d Value, ctx: &mut VisitContext<'_, 'd>) {
        let node_type = ctx.node_type;
        let kind = kind_of(node);

        if node_type.is_array() {
            // elements are visited with their own bound item type
            if kind != NodeKind::Array {
                ctx.report(Diagnostic::new(
                    format!("Expected type '{} (array)' but got '{}'", node_type.name, kind),
                    ctx.location.clone(),
                ));
            }
            return;
        }

        match node {
            Value::Object(map) => self.check_object(map, ctx),
            _ => ctx.report(Diagnostic::new(
                format!("Expected type '{} (object)' but got '{}'", node_type.name, kind),
                ctx.location.clone(),
            )),
        }
    }
}

fn report_unexpected(node_type: &NodeType, name: &str, location: Location, ctx: &mut VisitContext<'_, '_>) {
    ctx.report(
        Diagnostic::new(format!("Property '{}' is not expected here", name), location.key())
            .with_suggest(suggest_str(name, &node_type.property_names())),
    );
}

/// Enum values as they read in messages: strings bare, the rest as JSON
fn literal(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Key;
    use crate::resolve::Resolver;
    use crate::matcher::JsonType;
    use crate::types::{boolean, computed, named, one_of, scalar, string, string_list, unchecked};
    use serde_json::json;

    fn validate(node_type: &NodeType, node: &Value) -> Vec<Diagnostic> {
        validate_in(node_type, node, node, None)
    }

    fn validate_in(node_type: &NodeType, root: &Value, node: &Value, key: Option<&Key>) -> Vec<Diagnostic> {
        let resolver = Resolver::new(root, "test.yaml");
        let location = Location::root("test.yaml");
        let mut ctx = VisitContext::new(node_type, &location, key, &resolver);
        StructureValidator.enter(node, &mut ctx);
        ctx.into_diagnostics()
    }

    fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    fn info_type() -> NodeType {
        NodeType::object("Info")
            .prop("title", string())
            .required(&["title"])
    }

    #[test]
    fn test_info_examples() {
        let info = info_type();

        let missing = validate(&info, &json!({}));
        assert_eq!(messages(&missing), vec!["The field 'title' must be present on this level."]);
        assert!(missing[0].location.report_on_key);

        let wrong = validate(&info, &json!({ "title": 1 }));
        assert_eq!(messages(&wrong), vec!["Expected type 'string' but got 'number'"]);
        assert_eq!(wrong[0].location.pointer_string(), "#/title");
        assert!(!wrong[0].location.report_on_key);

        assert!(validate(&info, &json!({ "title": "ok" })).is_empty());
    }

    #[test]
    fn test_array_type_mismatch_stops() {
        let list = NodeType::list("TagList", "Tag");
        let diagnostics = validate(&list, &json!({ "unknown": 1 }));
        assert_eq!(messages(&diagnostics), vec!["Expected type 'TagList (array)' but got 'object'"]);

        assert!(validate(&list, &json!([1, "two"])).is_empty());
    }

    #[test]
    fn test_object_type_mismatch() {
        let diagnostics = validate(&info_type(), &json!("Info"));
        assert_eq!(messages(&diagnostics), vec!["Expected type 'Info (object)' but got 'string'"]);
    }

    #[test]
    fn test_unexpected_property_with_suggestion() {
        let diagnostics = validate(&info_type(), &json!({ "title": "x", "titel": "y" }));
        assert_eq!(messages(&diagnostics), vec!["Property 'titel' is not expected here"]);
        assert_eq!(diagnostics[0].suggest, vec!["title"]);
        assert!(diagnostics[0].location.report_on_key);
        assert_eq!(diagnostics[0].location.pointer_string(), "#/titel");
    }

    #[test]
    fn test_extensions_are_ignored() {
        let diagnostics = validate(&info_type(), &json!({ "title": "x", "x-logo": { "url": 1 } }));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_named_and_unchecked_properties_are_skipped() {
        let t = NodeType::object("Root")
            .prop("info", named("Info"))
            .prop("anything", unchecked());
        let diagnostics = validate(&t, &json!({ "info": 42, "anything": [null] }));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_enum_mismatch_suggests_nearest() {
        let t = NodeType::object("Operation").prop("method", one_of(&["get", "post"]));
        let diagnostics = validate(&t, &json!({ "method": "GET" }));
        assert_eq!(
            messages(&diagnostics),
            vec![r#"'method' can be one of following only: "get", "post""#]
        );
        assert_eq!(diagnostics[0].suggest, vec!["get"]);

        assert!(validate(&t, &json!({ "method": "post" })).is_empty());
    }

    #[test]
    fn test_enum_takes_precedence_over_type() {
        let schema = ScalarSchema {
            type_: Some(JsonType::Number.into()),
            ..ScalarSchema::one_of_strings(&["a"])
        };
        let t = NodeType::object("T").prop("v", scalar(schema));
        let diagnostics = validate(&t, &json!({ "v": "b" }));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("can be one of following only"));
    }

    #[test]
    fn test_array_items_report_each_element() {
        let t = NodeType::object("Operation").prop("tags", string_list());
        let diagnostics = validate(&t, &json!({ "tags": ["a", 1, true] }));
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].location.pointer_string(), "#/tags/1");
        assert_eq!(diagnostics[0].message, "Expected type 'string' but got 'number'");
        assert_eq!(diagnostics[1].message, "Expected type 'string' but got 'boolean'");

        let untyped = NodeType::object("Operation")
            .prop("tags", scalar(ScalarSchema {
                items: Some(JsonType::String.into()),
                ..Default::default()
            }));
        assert_eq!(validate(&untyped, &json!({ "tags": [1] })).len(), 1);
    }

    #[test]
    fn test_failed_array_type_skips_items() {
        let t = NodeType::object("Operation").prop("tags", string_list());
        let diagnostics = validate(&t, &json!({ "tags": "a" }));
        assert_eq!(messages(&diagnostics), vec!["Expected type 'array' but got 'string'"]);
    }

    #[test]
    fn test_referenceable_array_items_checked_after_resolution() {
        let root = json!({
            "x-tags": { "ops": ["read", 7] },
            "op": { "tags": { "$ref": "#/x-tags/ops" } }
        });
        let t = NodeType::object("Operation").prop(
            "tags",
            scalar(ScalarSchema::array_of(JsonType::String).referenceable()),
        );
        let diagnostics = validate_in(&t, &root, &root["op"], None);
        assert_eq!(messages(&diagnostics), vec!["Expected type 'string' but got 'number'"]);
        assert_eq!(diagnostics[0].location.pointer_string(), "#/tags/1");
    }

    #[test]
    fn test_referenceable_value_is_resolved_first() {
        let root = json!({
            "x-methods": { "X": "put" },
            "op": { "method": { "$ref": "#/x-methods/X" } }
        });
        let referenceable = ScalarSchema::one_of_strings(&["get", "post"]).referenceable();
        let t = NodeType::object("Op").prop("method", scalar(referenceable));

        let diagnostics = validate_in(&t, &root, &root["op"], None);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("can be one of following only"));

        let plain = NodeType::object("Op").prop("method", one_of(&["get", "post"]));
        let literal = validate_in(&plain, &root, &root["op"], None);
        assert_eq!(literal.len(), 1);
        assert!(literal[0].suggest.is_empty());
    }

    #[test]
    fn test_referenceable_target_that_matches_passes() {
        let root = json!({
            "x-methods": { "X": "get" },
            "op": { "method": { "$ref": "#/x-methods/X" } }
        });
        let referenceable = ScalarSchema::one_of_strings(&["get", "post"]).referenceable();
        let t = NodeType::object("Op").prop("method", scalar(referenceable));
        assert!(validate_in(&t, &root, &root["op"], None).is_empty());
    }

    fn needs_b_when_a(node: &Map<String, Value>, _key: Option<&Key>) -> Vec<&'static str> {
        if node.contains_key("a") {
            vec!["b"]
        } else {
            vec![]
        }
    }

    #[test]
    fn test_computed_required() {
        let t = NodeType::object("T")
            .prop("a", boolean())
            .prop("b", boolean())
            .required_by(needs_b_when_a);
        assert_eq!(validate(&t, &json!({ "a": true })).len(), 1);
        assert!(validate(&t, &json!({})).is_empty());
        assert!(validate(&t, &json!({ "a": true, "b": false })).is_empty());
    }

    fn only_strings(value: &Value, _name: &str) -> Option<PropSchema> {
        value
            .is_string()
            .then(|| PropSchema::Scalar(ScalarSchema::of(JsonType::String)))
    }

    #[test]
    fn test_computed_property_returning_none_is_unexpected() {
        let t = NodeType::object("T").additional(computed(only_strings));
        let diagnostics = validate(&t, &json!({ "ok": "s", "bad": 1 }));
        assert_eq!(messages(&diagnostics), vec!["Property 'bad' is not expected here"]);
    }

    #[test]
    fn test_options_are_rejected() {
        let mut settings = RuleSettings::new(crate::config::Severity::Error);
        assert!(StructureValidator::build(&settings).is_ok());
        settings.options.insert("strict".to_string(), json!(true));
        assert!(matches!(
            StructureValidator::build(&settings),
            Err(LintError::Configuration { .. })
        ));
    }
}
