//! Report configuration
//!
//! Settings come from three layers, highest precedence first:
//! command-line flags, a `querystat.toml` file, and the per-input defaults
//! in [`ReportOptions`].
//!
//! # Example querystat.toml
//!
//! ```toml
//! [report]
//! cutoffs = [5, 10, 20, 50]
//! min_attribute_count = 2
//!
//! [logs]
//! marker = "LOAD"
//! ```

use crate::cli::Cli;
use crate::log_scan::DEFAULT_QUERY_MARKER;
use crate::report::ReportOptions;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Root configuration for querystat.toml
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub report: ReportSection,
    pub logs: LogSection,
}

/// `[report]` table
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSection {
    pub cutoffs: Option<Vec<usize>>,
    pub min_attribute_count: Option<u64>,
}

/// `[logs]` table
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LogSection {
    pub marker: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML")
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub report: ReportOptions,
    pub marker: String,
}

impl Settings {
    /// Layer CLI flags over the config file over `defaults`
    pub fn resolve(defaults: ReportOptions, file: &ConfigFile, cli: &Cli) -> Result<Self> {
        let mut report = defaults;

        if let Some(cutoffs) = cli.top.as_ref().or(file.report.cutoffs.as_ref()) {
            report.cutoffs = cutoffs.clone();
        }
        if let Some(min) = cli.min_count.or(file.report.min_attribute_count) {
            report.min_attribute_count = min;
        }

        if report.cutoffs.contains(&0) {
            bail!("Top-K cutoffs are 1-based ranks; 0 is not allowed");
        }

        let marker = cli
            .marker
            .clone()
            .or_else(|| file.logs.marker.clone())
            .unwrap_or_else(|| DEFAULT_QUERY_MARKER.to_string());
        if marker.is_empty() {
            bail!("Query marker must not be empty");
        }

        Ok(Self { report, marker })
    }
}
