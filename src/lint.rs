//! Lint entry points
//!
//! Ties the pieces together for one document: detect the version, build the
//! type tree, activate the configured checks and walk.

use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::config::LintConfig;
use crate::error::{LintError, Result};
use crate::rules::builtin::{self, UNRESOLVED_REFS};
use crate::rules::{activate, ActiveCheck, CheckKind, Problem, RuleSet, SettingsSource};
use crate::types;
use crate::version::OasVersion;
use crate::walk::{walk_document, WalkOptions};

/// Extensions recognised by [`parse_file`]
pub const DOCUMENT_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// Checks of every namespace, activated for one version
#[derive(Debug, Default)]
pub struct ActiveChecks {
    pub preprocessors: Vec<ActiveCheck>,
    pub rules: Vec<ActiveCheck>,
    pub decorators: Vec<ActiveCheck>,
}

/// A configured linter
///
/// Built-in rule sets are always registered; extra sets are appended after
/// them in the order they are added.
#[derive(Debug, Clone)]
pub struct Linter {
    config: LintConfig,
    rules: Vec<RuleSet>,
    preprocessors: Vec<RuleSet>,
    decorators: Vec<RuleSet>,
}

impl Linter {
    pub fn new(config: LintConfig) -> Self {
        Self {
            config,
            rules: Vec::new(),
            preprocessors: Vec::new(),
            decorators: Vec::new(),
        }
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    pub fn with_rules(mut self, rule_set: RuleSet) -> Self {
        self.rules.push(rule_set);
        self
    }

    pub fn with_preprocessors(mut self, rule_set: RuleSet) -> Self {
        self.preprocessors.push(rule_set);
        self
    }

    pub fn with_decorators(mut self, rule_set: RuleSet) -> Self {
        self.decorators.push(rule_set);
        self
    }

    /// Activate all namespaces for `version`
    pub fn activate(&self, version: OasVersion) -> Result<ActiveChecks> {
        let mut rule_sets = builtin::rules(version);
        rule_sets.extend(self.rules.iter().cloned());

        Ok(ActiveChecks {
            preprocessors: activate(
                &self.preprocessors,
                &self.config,
                CheckKind::Preprocessors,
                version,
            )?,
            rules: activate(&rule_sets, &self.config, CheckKind::Rules, version)?,
            decorators: activate(&self.decorators, &self.config, CheckKind::Decorators, version)?,
        })
    }

    /// Lint a parsed document; `source` names it in problem locations
    ///
    /// Preprocessors run before rules at every node. Decorators are only
    /// activated, never run by a lint.
    pub fn lint_document(&self, document: &Value, source: &str) -> Result<Vec<Problem>> {
        let version = OasVersion::detect(document)?;
        let registry = types::for_version(version)?;

        let active = self.activate(version)?;
        let mut checks = active.preprocessors;
        checks.extend(active.rules);

        let options = WalkOptions {
            unresolved_refs: self
                .config
                .get_rule_settings(UNRESOLVED_REFS, version)
                .severity,
        };
        debug!(source, %version, checks = checks.len(), "linting document");
        walk_document(document, source, &registry, &checks, options)
    }

    /// Read, parse and lint a file
    pub fn lint_file(&self, path: &Path) -> Result<Vec<Problem>> {
        let document = parse_file(path)?;
        self.lint_document(&document, &path.display().to_string())
    }
}

/// Lint a parsed document with the built-in rules
pub fn lint_document(document: &Value, source: &str, config: &LintConfig) -> Result<Vec<Problem>> {
    Linter::new(config.clone()).lint_document(document, source)
}

/// Lint a JSON or YAML file with the built-in rules
pub fn lint_file(path: &Path, config: &LintConfig) -> Result<Vec<Problem>> {
    Linter::new(config.clone()).lint_file(path)
}

/// Does `path` have one of the [`DOCUMENT_EXTENSIONS`]
pub fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| DOCUMENT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Parse a document, choosing JSON or YAML by extension
pub fn parse_file(path: &Path) -> Result<Value> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let content = std::fs::read_to_string(path)?;

    match extension.as_deref() {
        Some("json") => Ok(serde_json::from_str(&content)?),
        Some("yaml") | Some("yml") => parse_yaml(&content),
        _ => Err(LintError::UnsupportedFile(path.display().to_string())),
    }
}

/// Parse YAML into a JSON value; non-string mapping keys become strings
pub fn parse_yaml(content: &str) -> Result<Value> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    Ok(serde_json::to_value(yaml)?)
}
