//! Built-in rule sets
//!
//! The structural rule plus a few presence checks. None of them take
//! options.

use serde_json::Value;

use super::structure::{self, StructureValidator};
use super::{Diagnostic, RuleSet, VisitContext, Visitor};
use crate::config::RuleSettings;
use crate::error::{LintError, Result};
use crate::version::OasVersion;

/// Rule id for references the walker cannot follow
pub const UNRESOLVED_REFS: &str = "no-unresolved-refs";

fn reject_options(rule_id: &str, settings: &RuleSettings) -> Result<()> {
    match settings.options.keys().next() {
        Some(option) => Err(LintError::configuration(
            rule_id,
            format!("unexpected option '{}'", option),
        )),
        None => Ok(()),
    }
}

/// Reports an object of `type_name` that lacks `field`
struct RequireField {
    type_name: &'static str,
    field: &'static str,
    message: &'static str,
}

impl Visitor for RequireField {
    fn enter<'d>(&self, node: &'d Value, ctx: &mut VisitContext<'_, 'd>) {
        if ctx.node_type.name != self.type_name {
            return;
        }
        if let Some(map) = node.as_object() {
            if !map.contains_key(self.field) {
                ctx.report(Diagnostic::new(self.message, ctx.location.key()));
            }
        }
    }
}

fn info_contact(settings: &RuleSettings) -> Result<Box<dyn Visitor>> {
    reject_options("info-contact", settings)?;
    Ok(Box::new(RequireField {
        type_name: "Info",
        field: "contact",
        message: "Info object should contain `contact` field.",
    }))
}

fn operation_operation_id(settings: &RuleSettings) -> Result<Box<dyn Visitor>> {
    reject_options("operation-operationId", settings)?;
    Ok(Box::new(RequireField {
        type_name: "Operation",
        field: "operationId",
        message: "Operation object should contain `operationId` field.",
    }))
}

struct NoEmptyServers;

impl Visitor for NoEmptyServers {
    fn enter<'d>(&self, node: &'d Value, ctx: &mut VisitContext<'_, 'd>) {
        if ctx.node_type.name != "Root" {
            return;
        }
        let Some(map) = node.as_object() else { return };
        match map.get("servers") {
            None => ctx.report(Diagnostic::new(
                "Servers must be present.",
                ctx.location.child(["openapi"]).key(),
            )),
            Some(Value::Array(servers)) if servers.is_empty() => ctx.report(Diagnostic::new(
                "Servers must be a non-empty array.",
                ctx.location.child(["servers"]).key(),
            )),
            Some(_) => {}
        }
    }
}

fn no_empty_servers(settings: &RuleSettings) -> Result<Box<dyn Visitor>> {
    reject_options("no-empty-servers", settings)?;
    Ok(Box::new(NoEmptyServers))
}

/// Rule sets enabled for a document version, in activation order
pub fn rules(version: OasVersion) -> Vec<RuleSet> {
    let core = RuleSet::new().with(structure::RULE_ID, StructureValidator::build);
    let mut presence = RuleSet::new()
        .with("info-contact", info_contact)
        .with("operation-operationId", operation_operation_id);
    if version == OasVersion::Oas3 {
        presence = presence.with("no-empty-servers", no_empty_servers);
    }
    vec![core, presence]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LintConfig, Severity};
    use crate::location::Location;
    use crate::resolve::Resolver;
    use crate::rules::{activate, CheckKind};
    use crate::types::NodeType;
    use serde_json::json;

    fn run(visitor: &dyn Visitor, type_name: &'static str, node: &Value) -> Vec<Diagnostic> {
        let node_type = NodeType::object(type_name);
        let resolver = Resolver::new(node, "t.yaml");
        let location = Location::root("t.yaml");
        let mut ctx = VisitContext::new(&node_type, &location, None, &resolver);
        visitor.enter(node, &mut ctx);
        ctx.into_diagnostics()
    }

    #[test]
    fn test_info_contact() {
        let visitor = info_contact(&RuleSettings::new(Severity::Warn)).unwrap();
        assert_eq!(run(visitor.as_ref(), "Info", &json!({ "title": "t" })).len(), 1);
        assert!(run(visitor.as_ref(), "Info", &json!({ "contact": {} })).is_empty());
        assert!(run(visitor.as_ref(), "License", &json!({})).is_empty());
    }

    #[test]
    fn test_no_empty_servers() {
        let visitor = no_empty_servers(&RuleSettings::new(Severity::Warn)).unwrap();
        let missing = run(visitor.as_ref(), "Root", &json!({ "openapi": "3.0.0" }));
        assert_eq!(missing[0].message, "Servers must be present.");
        let empty = run(visitor.as_ref(), "Root", &json!({ "servers": [] }));
        assert_eq!(empty[0].message, "Servers must be a non-empty array.");
        assert!(run(visitor.as_ref(), "Root", &json!({ "servers": [{ "url": "/" }] })).is_empty());
    }

    #[test]
    fn test_builtin_options_are_rejected() {
        let mut settings = RuleSettings::new(Severity::Warn);
        settings.options.insert("level".to_string(), json!(2));
        assert!(operation_operation_id(&settings).is_err());
    }

    #[test]
    fn test_rule_sets_per_version() {
        let ids = |version| -> Vec<&'static str> {
            rules(version).iter().flat_map(|set| set.ids().collect::<Vec<_>>()).collect()
        };
        assert_eq!(ids(OasVersion::Oas2), vec!["spec", "info-contact", "operation-operationId"]);
        assert!(ids(OasVersion::Oas3).contains(&"no-empty-servers"));
    }

    #[test]
    fn test_recommended_activation() {
        let config = LintConfig::default();
        let checks = activate(&rules(OasVersion::Oas3), &config, CheckKind::Rules, OasVersion::Oas3).unwrap();
        let active: Vec<(&str, Severity)> = checks.iter().map(|c| (c.rule_id.as_str(), c.severity)).collect();
        assert_eq!(
            active,
            vec![
                ("spec", Severity::Error),
                ("info-contact", Severity::Warn),
                ("operation-operationId", Severity::Warn),
                ("no-empty-servers", Severity::Warn),
            ]
        );
    }
}
