//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use clap::ValueEnum;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Catalog, Config, OperatingConditions, Project};
use crate::entities::{Motor, Ratio, Reducer};

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Project, configuration and catalog directory for one invocation
pub struct Workspace {
    pub project: Option<Project>,
    pub config: Config,
    pub data_dir: PathBuf,
}

impl Workspace {
    /// Resolve the project (explicit `--project` must exist) and layered config
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let project = match &global.project {
            Some(path) => Some(Project::discover_from(path).map_err(|e| miette::miette!("{}", e))?),
            None => Project::discover().ok(),
        };
        let config = Config::load_for(project.as_ref());
        let data_dir = config.data_dir(project.as_ref());
        tracing::debug!(data_dir = %data_dir.display(), project = project.is_some(), "workspace resolved");

        Ok(Self {
            project,
            config,
            data_dir,
        })
    }

    /// Load and validate the catalog
    pub fn catalog(&self) -> Result<Catalog> {
        Ok(Catalog::load(&self.data_dir)?)
    }

    /// `--format` if given, else the configured default, else `Auto`
    pub fn format(&self, global: &GlobalOpts) -> OutputFormat {
        if global.format != OutputFormat::Auto {
            return global.format;
        }
        self.config
            .default_format
            .as_deref()
            .and_then(|f| OutputFormat::from_str(f, true).ok())
            .unwrap_or(OutputFormat::Auto)
    }

    /// Configured operating conditions with command-line overrides applied
    pub fn conditions(
        &self,
        load_type: Option<&str>,
        hours_per_day: Option<f64>,
        mounting: Option<&str>,
    ) -> OperatingConditions {
        let mut conditions = self.config.conditions();
        if let Some(load_type) = load_type {
            conditions.load_type = load_type.parse().unwrap_or_default();
        }
        if let Some(hours) = hours_per_day {
            conditions.hours_per_day = hours;
        }
        if let Some(mounting) = mounting {
            conditions.mounting_direction = mounting.to_string();
        }
        conditions
    }
}

/// Print `value` as JSON or YAML when that format was requested.
///
/// Returns `false` for the other formats so the caller renders its own view.
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).into_diagnostic()?;
            println!("{}", json);
            Ok(true)
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(value).into_diagnostic()?;
            print!("{}", yaml);
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Look up a motor by id or model name
pub fn find_motor<'a>(catalog: &'a Catalog, key: &str) -> Result<&'a Motor> {
    catalog.motor(key).ok_or_else(|| {
        miette::miette!(
            help = "run `gbx motor list` to see catalog motors",
            "No motor found matching '{}'",
            key
        )
    })
}

/// Look up a reducer by id or model name
pub fn find_reducer<'a>(catalog: &'a Catalog, key: &str) -> Result<&'a Reducer> {
    catalog.reducer(key).ok_or_else(|| {
        miette::miette!(
            help = "run `gbx reducer list` to see catalog gearboxes",
            "No gearbox found matching '{}'",
            key
        )
    })
}

/// Parse a ratio argument such as "10" or "10K"
pub fn parse_ratio(raw: &str) -> Result<Ratio> {
    let ratio = raw.parse::<Ratio>().map_err(|e| miette::miette!("{}", e))?;
    if !ratio.value().is_finite() || ratio.value() <= 0.0 {
        return Err(miette::miette!("Ratio must be a positive number, got '{}'", raw));
    }
    Ok(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }

    #[test]
    fn test_truncate_str_multibyte() {
        assert_eq!(truncate_str("균일부하 모터", 5), "균일...");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("with\nnewline"), "\"with\nnewline\"");
    }

    #[test]
    fn test_parse_ratio() {
        assert_eq!(parse_ratio("10").unwrap(), Ratio::new(10.0));
        assert_eq!(parse_ratio("10K").unwrap(), Ratio::new(10.0));
        assert!(parse_ratio("ten").is_err());
        assert!(parse_ratio("0").is_err());
    }
}
