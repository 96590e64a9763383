//! Lint configuration
//!
//! Supports loading configuration from:
//! - Built-in presets (`extends = ["recommended"]`)
//! - Config file (oaslint.toml)
//! - Environment variables (OASLINT__*)
//!
//! ## Example config file (oaslint.toml):
//! ```toml
//! extends = ["recommended"]
//!
//! [rules]
//! info-contact = "off"
//! operation-operationId = { severity = "error" }
//!
//! [oas2_rules]
//! spec = "warn"
//! ```
//!
//! Settings are looked up per namespace (rules, preprocessors, decorators):
//! the version-specific table wins over the generic one, which wins over the
//! presets. A rule found nowhere is `off`.

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{LintError, Result};
use crate::rules::SettingsSource;
use crate::version::OasVersion;

/// Configured severity of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Off,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Off => write!(f, "off"),
            Severity::Warn => write!(f, "warn"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Resolved settings handed to a rule constructor
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSettings {
    pub severity: Severity,
    pub options: Map<String, Value>,
}

impl RuleSettings {
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            options: Map::new(),
        }
    }

    pub fn off() -> Self {
        Self::new(Severity::Off)
    }
}

/// One rule entry as written in a config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSetting {
    /// `rule-id = "warn"`
    Severity(Severity),
    /// `rule-id = { severity = "error", some-option = 3 }`
    Detailed {
        severity: Severity,
        #[serde(flatten)]
        options: Map<String, Value>,
    },
}

impl RuleSetting {
    pub fn to_settings(&self) -> RuleSettings {
        match self {
            RuleSetting::Severity(severity) => RuleSettings::new(*severity),
            RuleSetting::Detailed { severity, options } => RuleSettings {
                severity: *severity,
                options: options.clone(),
            },
        }
    }
}

pub type RuleTable = BTreeMap<String, RuleSetting>;

/// Built-in preset names accepted by `extends`
pub const PRESETS: &[&str] = &["recommended", "minimal"];

/// Main configuration for a lint run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Presets applied below the explicit tables
    pub extends: Vec<String>,

    pub rules: RuleTable,
    pub oas2_rules: RuleTable,
    pub oas3_rules: RuleTable,

    pub preprocessors: RuleTable,
    pub oas2_preprocessors: RuleTable,
    pub oas3_preprocessors: RuleTable,

    pub decorators: RuleTable,
    pub oas2_decorators: RuleTable,
    pub oas3_decorators: RuleTable,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            extends: vec!["recommended".to_string()],
            rules: RuleTable::new(),
            oas2_rules: RuleTable::new(),
            oas3_rules: RuleTable::new(),
            preprocessors: RuleTable::new(),
            oas2_preprocessors: RuleTable::new(),
            oas3_preprocessors: RuleTable::new(),
            decorators: RuleTable::new(),
            oas2_decorators: RuleTable::new(),
            oas3_decorators: RuleTable::new(),
        }
    }
}

/// Severity a preset assigns to a rule
fn preset_severity(preset: &str, rule_id: &str) -> Option<Severity> {
    match (preset, rule_id) {
        ("recommended" | "minimal", "spec") => Some(Severity::Error),
        ("recommended" | "minimal", "no-unresolved-refs") => Some(Severity::Error),
        ("recommended", "info-contact") => Some(Severity::Warn),
        ("recommended", "operation-operationId") => Some(Severity::Warn),
        ("recommended", "no-empty-servers") => Some(Severity::Warn),
        _ => None,
    }
}

// Rule ids are matched exactly first; environment sources may lowercase keys
fn lookup<'a>(table: &'a RuleTable, rule_id: &str) -> Option<&'a RuleSetting> {
    table.get(rule_id).or_else(|| {
        table
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(rule_id))
            .map(|(_, setting)| setting)
    })
}

impl LintConfig {
    /// Configuration with no presets and no rules enabled
    pub fn empty() -> Self {
        Self {
            extends: Vec::new(),
            ..Self::default()
        }
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, optionally from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = ["oaslint.toml", ".oaslint.toml", "config/oaslint.toml"];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "oaslint") {
            let xdg_config = config_dir.config_dir().join("oaslint.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("OASLINT")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: LintConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject unknown presets
    pub fn validate(&self) -> Result<()> {
        for preset in &self.extends {
            if !PRESETS.contains(&preset.as_str()) {
                return Err(LintError::configuration(
                    "extends",
                    format!("unknown preset '{}', expected one of: {}", preset, PRESETS.join(", ")),
                ));
            }
        }
        Ok(())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Set a rule's severity in the generic rules table
    pub fn set_rule(&mut self, rule_id: impl Into<String>, severity: Severity) -> &mut Self {
        self.rules.insert(rule_id.into(), RuleSetting::Severity(severity));
        self
    }

    fn resolve(
        &self,
        generic: &RuleTable,
        versioned: &RuleTable,
        rule_id: &str,
        use_presets: bool,
    ) -> RuleSettings {
        if let Some(setting) = lookup(versioned, rule_id).or_else(|| lookup(generic, rule_id)) {
            return setting.to_settings();
        }
        if use_presets {
            // later presets override earlier ones
            let preset = self
                .extends
                .iter()
                .rev()
                .find_map(|preset| preset_severity(preset, rule_id));
            if let Some(severity) = preset {
                return RuleSettings::new(severity);
            }
        }
        RuleSettings::off()
    }
}

impl SettingsSource for LintConfig {
    fn get_rule_settings(&self, rule_id: &str, version: OasVersion) -> RuleSettings {
        let versioned = match version {
            OasVersion::Oas2 => &self.oas2_rules,
            OasVersion::Oas3 => &self.oas3_rules,
        };
        self.resolve(&self.rules, versioned, rule_id, true)
    }

    fn get_preprocessor_settings(&self, rule_id: &str, version: OasVersion) -> RuleSettings {
        let versioned = match version {
            OasVersion::Oas2 => &self.oas2_preprocessors,
            OasVersion::Oas3 => &self.oas3_preprocessors,
        };
        self.resolve(&self.preprocessors, versioned, rule_id, false)
    }

    fn get_decorator_settings(&self, rule_id: &str, version: OasVersion) -> RuleSettings {
        let versioned = match version {
            OasVersion::Oas2 => &self.oas2_decorators,
            OasVersion::Oas3 => &self.oas3_decorators,
        };
        self.resolve(&self.decorators, versioned, rule_id, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_recommended() {
        let config = LintConfig::default();
        let spec = config.get_rule_settings("spec", OasVersion::Oas3);
        assert_eq!(spec.severity, Severity::Error);
        let contact = config.get_rule_settings("info-contact", OasVersion::Oas3);
        assert_eq!(contact.severity, Severity::Warn);
        let unknown = config.get_rule_settings("not-a-rule", OasVersion::Oas3);
        assert_eq!(unknown.severity, Severity::Off);
    }

    #[test]
    fn test_version_table_overrides_generic() {
        let mut config = LintConfig::default();
        config.set_rule("spec", Severity::Warn);
        config
            .oas2_rules
            .insert("spec".to_string(), RuleSetting::Severity(Severity::Off));

        assert_eq!(
            config.get_rule_settings("spec", OasVersion::Oas3).severity,
            Severity::Warn
        );
        assert_eq!(
            config.get_rule_settings("spec", OasVersion::Oas2).severity,
            Severity::Off
        );
    }

    #[test]
    fn test_namespaces_are_independent() {
        let mut config = LintConfig::default();
        config.set_rule("shared-id", Severity::Error);
        config.decorators.insert(
            "shared-id".to_string(),
            RuleSetting::Severity(Severity::Warn),
        );

        assert_eq!(
            config.get_rule_settings("shared-id", OasVersion::Oas3).severity,
            Severity::Error
        );
        assert_eq!(
            config.get_decorator_settings("shared-id", OasVersion::Oas3).severity,
            Severity::Warn
        );
        assert_eq!(
            config.get_preprocessor_settings("shared-id", OasVersion::Oas3).severity,
            Severity::Off
        );
    }

    #[test]
    fn test_detailed_setting_from_toml() {
        let config: LintConfig = toml::from_str(
            r#"
            extends = []

            [rules]
            operation-operationId = { severity = "error", allow-missing = true }
            "#,
        )
        .unwrap();

        let settings = config.get_rule_settings("operation-operationId", OasVersion::Oas2);
        assert_eq!(settings.severity, Severity::Error);
        assert_eq!(settings.options.get("allow-missing"), Some(&Value::Bool(true)));
        assert_eq!(
            config.get_rule_settings("spec", OasVersion::Oas2).severity,
            Severity::Off
        );
    }

    #[test]
    fn test_unknown_preset_is_rejected() {
        let config = LintConfig {
            extends: vec!["strictest".to_string()],
            ..LintConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LintError::Configuration { .. })
        ));
    }

    #[test]
    fn test_serialize_config() {
        let mut config = LintConfig::default();
        config.set_rule("info-contact", Severity::Off);
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[rules]"));
        assert!(toml_str.contains("info-contact = \"off\""));
    }
}
