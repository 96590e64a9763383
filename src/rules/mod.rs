//! Rule Activation
//!
//! Rules, preprocessors and decorators are declared as [`RuleSet`]s mapping a
//! rule id to a constructor. [`activate`] applies configured severity and
//! options and returns the ordered list of [`ActiveCheck`]s the walker runs at
//! every node.
//!
//! ## Semantics
//! - Order is rule-set order, then declaration order inside a set.
//! - A rule whose severity is `off` is absent from the result.
//! - Duplicate ids across sets are all activated (a warning is logged).
//! - Constructor errors abort activation unchanged.

pub mod builtin;
pub mod structure;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

use crate::config::{RuleSettings, Severity};
use crate::error::Result;
use crate::location::{Key, Location};
use crate::resolve::{Resolved, Resolver};
use crate::types::NodeType;
use crate::version::OasVersion;

pub use structure::StructureValidator;

/// Settings namespace a rule set belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    Rules,
    Preprocessors,
    Decorators,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::Rules => write!(f, "rules"),
            CheckKind::Preprocessors => write!(f, "preprocessors"),
            CheckKind::Decorators => write!(f, "decorators"),
        }
    }
}

/// Where activation reads per-rule settings from
pub trait SettingsSource {
    fn get_rule_settings(&self, rule_id: &str, version: OasVersion) -> RuleSettings;
    fn get_preprocessor_settings(&self, rule_id: &str, version: OasVersion) -> RuleSettings;
    fn get_decorator_settings(&self, rule_id: &str, version: OasVersion) -> RuleSettings;

    fn settings_for(&self, kind: CheckKind, rule_id: &str, version: OasVersion) -> RuleSettings {
        match kind {
            CheckKind::Rules => self.get_rule_settings(rule_id, version),
            CheckKind::Preprocessors => self.get_preprocessor_settings(rule_id, version),
            CheckKind::Decorators => self.get_decorator_settings(rule_id, version),
        }
    }
}

/// A finding reported by a visitor; severity is attached by the walker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggest: Vec<String>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            location,
            suggest: Vec::new(),
        }
    }

    pub fn with_suggest(mut self, suggest: Vec<String>) -> Self {
        self.suggest = suggest;
        self
    }
}

/// A diagnostic attributed to the check that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggest: Vec<String>,
}

impl Problem {
    pub fn from_diagnostic(rule_id: &str, severity: Severity, diagnostic: Diagnostic) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity,
            message: diagnostic.message,
            location: diagnostic.location,
            suggest: diagnostic.suggest,
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({})",
            self.severity, self.rule_id, self.message, self.location
        )?;
        if !self.suggest.is_empty() {
            write!(f, "\n  did you mean: {}?", self.suggest.join(", "))?;
        }
        Ok(())
    }
}

/// Per-node context handed to visitors
pub struct VisitContext<'v, 'd> {
    /// Type bound to the node by the walker
    pub node_type: &'v NodeType,
    pub location: &'v Location,
    /// The node's key in its parent; `None` at the root
    pub key: Option<&'v Key>,
    resolver: &'v Resolver<'d>,
    diagnostics: Vec<Diagnostic>,
}

impl<'v, 'd> VisitContext<'v, 'd> {
    pub fn new(
        node_type: &'v NodeType,
        location: &'v Location,
        key: Option<&'v Key>,
        resolver: &'v Resolver<'d>,
    ) -> Self {
        Self {
            node_type,
            location,
            key,
            resolver,
            diagnostics: Vec::new(),
        }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn resolve(&self, value: &'d Value) -> Resolved<'d> {
        self.resolver.resolve(value)
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// A compiled check run at every node the walker enters
pub trait Visitor: Send + Sync {
    fn enter<'d>(&self, node: &'d Value, ctx: &mut VisitContext<'_, 'd>);
}

/// Builds a visitor from its settings; invalid options are a
/// [`LintError::Configuration`](crate::error::LintError::Configuration)
pub type RuleConstructor = fn(&RuleSettings) -> Result<Box<dyn Visitor>>;

/// Rule ids mapped to constructors, in declaration order
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    entries: Vec<(&'static str, RuleConstructor)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rule_id: &'static str, constructor: RuleConstructor) -> Self {
        self.entries.push((rule_id, constructor));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, RuleConstructor)> + '_ {
        self.entries.iter().copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A rule at its configured severity, bound to its visitor
pub struct ActiveCheck {
    pub rule_id: String,
    pub severity: Severity,
    pub visitor: Box<dyn Visitor>,
}

impl fmt::Debug for ActiveCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveCheck")
            .field("rule_id", &self.rule_id)
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}

/// Build the active checks of one namespace for a document version
pub fn activate<S>(
    rule_sets: &[RuleSet],
    config: &S,
    kind: CheckKind,
    version: OasVersion,
) -> Result<Vec<ActiveCheck>>
where
    S: SettingsSource + ?Sized,
{
    let mut active = Vec::new();
    let mut seen = HashSet::new();

    for (rule_id, constructor) in rule_sets.iter().flat_map(RuleSet::iter) {
        if !seen.insert(rule_id) {
            warn!(rule_id, %kind, "rule id declared more than once; every declaration is activated");
        }

        let settings = config.settings_for(kind, rule_id, version);
        if settings.severity == Severity::Off {
            debug!(rule_id, %kind, %version, "rule is off");
            continue;
        }

        let visitor = constructor(&settings)?;
        debug!(rule_id, %kind, %version, severity = %settings.severity, "rule activated");
        active.push(ActiveCheck {
            rule_id: rule_id.to_string(),
            severity: settings.severity,
            visitor,
        });
    }

    Ok(active)
}
