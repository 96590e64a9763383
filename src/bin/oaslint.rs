//! OpenAPI Linter CLI
//!
//! Lints OpenAPI 3.0 / Swagger 2.0 documents and directories of them.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use oaslint::lint::is_document;
use oaslint::{LintConfig, Linter, Problem, Severity};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// Human-readable, grouped by file
    Stylish,
    /// One JSON array of problems
    Json,
}

#[derive(Parser)]
#[command(name = "oaslint")]
#[command(about = "Validate the structure of OpenAPI documents")]
struct Cli {
    /// Files or directories to lint
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Config file (defaults to oaslint.toml lookup)
    #[arg(short, long)]
    config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "stylish")]
    format: Format,

    /// Stop printing after this many problems per file
    #[arg(long, default_value_t = 100)]
    max_problems: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

/// Returns `false` when any error-severity problem was found
fn run(cli: Cli) -> Result<bool> {
    let config = LintConfig::load_from(cli.config.as_deref()).context("loading configuration")?;
    let linter = Linter::new(config);

    let files = collect_files(&cli.paths);
    if files.is_empty() {
        warn!("no .json, .yaml or .yml files found");
    }

    let mut shown: Vec<Problem> = Vec::new();
    let mut errors = 0;
    let mut warnings = 0;
    for file in &files {
        let problems = linter
            .lint_file(file)
            .with_context(|| format!("linting {}", file.display()))?;

        let report = FileReport::new(problems, cli.max_problems);
        errors += report.errors;
        warnings += report.warnings;

        if let Format::Stylish = cli.format {
            print_stylish(file, &report);
        }
        shown.extend(report.shown);
    }

    if let Format::Json = cli.format {
        println!("{}", serde_json::to_string_pretty(&shown)?);
    }

    info!(files = files.len(), errors, warnings, "lint finished");

    Ok(errors == 0)
}

/// Problems of one file: counts cover every problem, `shown` is capped
struct FileReport {
    errors: usize,
    warnings: usize,
    hidden: usize,
    shown: Vec<Problem>,
}

impl FileReport {
    fn new(problems: Vec<Problem>, max_problems: usize) -> Self {
        let errors = problems
            .iter()
            .filter(|p| p.severity == Severity::Error)
            .count();
        let warnings = problems.len() - errors;
        let hidden = problems.len().saturating_sub(max_problems);
        let shown = problems.into_iter().take(max_problems).collect();
        Self {
            errors,
            warnings,
            hidden,
            shown,
        }
    }
}

fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = walkdir::WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && is_document(e.path()))
                .map(|e| e.into_path())
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    files
}

fn print_stylish(file: &Path, report: &FileReport) {
    if report.shown.is_empty() && report.hidden == 0 {
        println!("✅ {}", file.display());
        return;
    }

    println!("{}", file.display());
    for problem in &report.shown {
        let marker = match problem.severity {
            Severity::Error => "❌",
            _ => "⚠️ ",
        };
        println!(
            "  {} {}  {}  [{}]",
            marker,
            problem.location.pointer_string(),
            problem.message,
            problem.rule_id
        );
        if !problem.suggest.is_empty() {
            println!("     did you mean: {}?", problem.suggest.join(", "));
        }
    }
    if report.hidden > 0 {
        println!("  ... {} more", report.hidden);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use oaslint::Location;

    fn problem(severity: Severity) -> Problem {
        Problem {
            rule_id: "spec".to_string(),
            severity,
            message: "m".to_string(),
            location: Location::root("api.yaml"),
            suggest: Vec::new(),
        }
    }

    #[test]
    fn test_errors_beyond_the_cap_are_counted() {
        let report = FileReport::new(vec![problem(Severity::Warn), problem(Severity::Error)], 1);
        assert_eq!(report.errors, 1);
        assert_eq!(report.warnings, 1);
        assert_eq!(report.hidden, 1);
        assert_eq!(report.shown.len(), 1);
        assert_eq!(report.shown[0].severity, Severity::Warn);
    }

    #[test]
    fn test_report_under_the_cap_shows_everything() {
        let report = FileReport::new(vec![problem(Severity::Warn)], 100);
        assert_eq!(report.errors, 0);
        assert_eq!(report.hidden, 0);
        assert_eq!(report.shown.len(), 1);
    }
}
