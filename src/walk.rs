//! Document traversal
//!
//! Walks a parsed document together with its type tree, binding a
//! [`NodeType`] to every node and running the active checks there. The walk
//! follows the document: a property is descended into only when its
//! effective schema names a type, and `$ref` values are resolved to their
//! targets first.
//!
//! Each (target pointer, type) pair is visited at most once, so a component
//! referenced from many places is reported once and recursive schemas
//! terminate.

use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

use crate::config::Severity;
use crate::error::Result;
use crate::location::{Key, Location};
use crate::resolve::{is_ref, Resolver};
use crate::rules::builtin::UNRESOLVED_REFS;
use crate::rules::{ActiveCheck, Problem, VisitContext};
use crate::types::{NodeType, PropSchema, TypeName, TypeRegistry};

/// Walker settings not carried by the checks themselves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    /// Severity for references that cannot be followed; `Off` drops them
    pub unresolved_refs: Severity,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            unresolved_refs: Severity::Error,
        }
    }
}

struct Walker<'w, 'd> {
    registry: &'w TypeRegistry,
    checks: &'w [ActiveCheck],
    options: WalkOptions,
    resolver: Resolver<'d>,
    visited: HashSet<(String, TypeName)>,
    problems: Vec<Problem>,
}

impl<'w, 'd> Walker<'w, 'd> {
    fn visit(
        &mut self,
        node: &'d Value,
        node_type: &'w NodeType,
        location: Location,
        key: Option<&Key>,
    ) -> Result<()> {
        let mut node = node;
        let mut location = location;

        if is_ref(node) {
            let resolved = self.resolver.resolve(node);
            match resolved.node {
                Some(target) => {
                    node = target;
                    if let Some(target_location) = resolved.location {
                        location = target_location;
                    }
                }
                None => {
                    let message = resolved
                        .error
                        .unwrap_or_else(|| "Can't resolve $ref".to_string());
                    self.report_unresolved(message, location.child(["$ref"]));
                    return Ok(());
                }
            }
        }

        if !self
            .visited
            .insert((location.pointer_string(), node_type.name))
        {
            debug!(pointer = %location.pointer_string(), type_name = node_type.name, "already visited");
            return Ok(());
        }

        let checks = self.checks;
        for check in checks {
            let diagnostics = {
                let mut ctx = VisitContext::new(node_type, &location, key, &self.resolver);
                check.visitor.enter(node, &mut ctx);
                ctx.into_diagnostics()
            };
            self.problems.extend(
                diagnostics
                    .into_iter()
                    .map(|d| Problem::from_diagnostic(&check.rule_id, check.severity, d)),
            );
        }

        if let Some(item_type) = node_type.items {
            if let Value::Array(items) = node {
                let item_type = self.registry.expect(item_type)?;
                for (i, item) in items.iter().enumerate() {
                    let item_key = Key::Index(i);
                    self.visit(item, item_type, location.child([i]), Some(&item_key))?;
                }
            }
            return Ok(());
        }

        if let Value::Object(map) = node {
            for (name, value) in map {
                let Some(slot) = node_type.property(name) else {
                    continue;
                };
                let Some(schema) = slot.resolve(value, name) else {
                    continue;
                };
                if let PropSchema::Named(type_name) = schema.as_ref() {
                    let child_type = self.registry.expect(type_name)?;
                    let child_key = Key::from(name.as_str());
                    self.visit(
                        value,
                        child_type,
                        location.child([name.as_str()]),
                        Some(&child_key),
                    )?;
                }
            }
        }

        Ok(())
    }

    fn report_unresolved(&mut self, message: String, location: Location) {
        if self.options.unresolved_refs == Severity::Off {
            debug!(%location, "unresolved reference ignored");
            return;
        }
        self.problems.push(Problem {
            rule_id: UNRESOLVED_REFS.to_string(),
            severity: self.options.unresolved_refs,
            message,
            location,
            suggest: Vec::new(),
        });
    }
}

/// Run `checks` over `document`, starting at the registry's root type
///
/// Problems are returned in traversal order. Errors only come from the type
/// tree naming a type the registry does not define.
pub fn walk_document(
    document: &Value,
    source: &str,
    registry: &TypeRegistry,
    checks: &[ActiveCheck],
    options: WalkOptions,
) -> Result<Vec<Problem>> {
    let mut walker = Walker {
        registry,
        checks,
        options,
        resolver: Resolver::new(document, source),
        visited: HashSet::new(),
        problems: Vec::new(),
    };
    walker.visit(document, registry.root(), Location::root(source), None)?;
    debug!(
        source,
        nodes = walker.visited.len(),
        problems = walker.problems.len(),
        "walk finished"
    );
    Ok(walker.problems)
}
