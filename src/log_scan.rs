//! Attribute extraction from query logs
//!
//! Log input is an index file listing one log path per line. Each log is
//! scanned line by line:
//! - lines starting with the query marker (default `LOAD`) count as queries
//! - every single-quoted token on any line counts as an attribute
//!
//! The two passes are independent, so `LOAD 'x/y/z' 'w'` yields one query
//! and two attributes.

use crate::error::{AnalyzeError, Result};
use crate::stats::AttributeStats;
use regex::Regex;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Marker that starts a query line
pub const DEFAULT_QUERY_MARKER: &str = "LOAD";

/// Non-greedy, non-nested single-quoted token
const QUOTED_TOKEN_PATTERN: &str = r"'(.*?)'";

/// Scans log lines for queries and quoted attributes
#[derive(Debug, Clone)]
pub struct LogScanner {
    marker: String,
    quoted: Regex,
}

impl Default for LogScanner {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY_MARKER)
    }
}

impl LogScanner {
    /// Create a scanner counting lines that start with `marker`
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            quoted: Regex::new(QUOTED_TOKEN_PATTERN).expect("quoted token pattern is valid"),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Attributes quoted on `line`, in order of appearance
    pub fn quoted_attributes<'a>(
        &'a self,
        line: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.quoted
            .captures_iter(line)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
    }

    /// Record one log line
    pub fn scan_line(&self, stats: &mut AttributeStats, line: &str) {
        if line.starts_with(&self.marker) {
            stats.record_query();
        }
        for attribute in self.quoted_attributes(line) {
            stats.record_attribute(attribute);
        }
    }

    /// Record every line of a log
    pub fn scan_reader<R: BufRead>(
        &self,
        stats: &mut AttributeStats,
        reader: R,
    ) -> std::io::Result<()> {
        for line in reader.lines() {
            self.scan_line(stats, &line?);
        }
        Ok(())
    }

    /// Scan one log file
    pub fn scan_file<P: AsRef<Path>>(&self, stats: &mut AttributeStats, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| AnalyzeError::io(path, e))?;
        self.scan_reader(stats, BufReader::new(file))
            .map_err(|e| AnalyzeError::io(path, e))?;
        stats.record_file();
        Ok(())
    }

    /// Scan every log listed in an index file
    pub fn analyze_index<P: AsRef<Path>>(&self, index: P) -> Result<AttributeStats> {
        let logs = read_index(index)?;
        let mut stats = AttributeStats::new();
        // Log input always reports a file total, even when the index is empty
        stats.total_files = Some(0);

        for log in &logs {
            let mut scanned = AttributeStats::new();
            self.scan_file(&mut scanned, log)?;
            debug!(
                log = %log.display(),
                queries = scanned.total_queries,
                attributes = scanned.total_count,
                "scanned log"
            );
            stats.merge(&scanned);
        }

        info!(
            files = logs.len(),
            queries = stats.total_queries,
            attributes = stats.total_count,
            "analyzed log index"
        );
        Ok(stats)
    }
}

/// Read the log paths listed in an index file
///
/// One path per line; surrounding whitespace is trimmed and blank lines
/// are skipped.
pub fn read_index<P: AsRef<Path>>(index: P) -> Result<Vec<PathBuf>> {
    let index = index.as_ref();
    let content = fs::read_to_string(index).map_err(|e| AnalyzeError::io(index, e))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}
