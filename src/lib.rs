//! OpenAPI Structural Linter
//!
//! Validates OpenAPI 3.0 and Swagger 2.0 documents against a normalized
//! type tree describing what every position of the document may contain,
//! and runs configurable rules over the same traversal.
//!
//! ## Features
//!
//! - **Structural validation**: required fields, unexpected properties with
//!   suggestions, scalar types and enums, array/object shape
//! - **Node-dependent types**: required fields and property types computed
//!   from the document instance (path parameters, `items`, response codes)
//! - **Local `$ref` resolution**: shared components are validated once,
//!   cycles terminate
//! - **Rule activation**: per-version severities and options from
//!   `oaslint.toml`, presets, and environment variables
//!
//! ## Architecture
//!
//! ```text
//! document ──> version::OasVersion::detect
//!                 │
//!                 ├──> types::for_version ──> TypeRegistry
//!                 └──> rules::activate    ──> Vec<ActiveCheck>
//!                                                │
//!              walk::walk_document <─────────────┘
//!                 │
//!                 └──> Vec<Problem>
//! ```

pub mod config;
pub mod error;
pub mod lint;
pub mod location;
pub mod matcher;
pub mod resolve;
pub mod rules;
pub mod suggest;
pub mod types;
pub mod version;
pub mod walk;

pub use config::{LintConfig, RuleSetting, RuleSettings, Severity};
pub use error::{LintError, Result};
pub use lint::{lint_document, lint_file, Linter};
pub use location::{Key, Location};
pub use rules::{activate, ActiveCheck, CheckKind, Diagnostic, Problem, RuleSet, SettingsSource};
pub use types::{NodeType, TypeRegistry};
pub use version::OasVersion;
