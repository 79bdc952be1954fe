//! Input detection and dispatch to the session or log analyzer

use crate::cli::InputKind;
use crate::error::{AnalyzeError, Result};
use crate::log_scan::LogScanner;
use crate::report::ReportOptions;
use crate::session::Session;
use crate::stats::AttributeStats;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Resolve `Auto` to a concrete input kind
///
/// A `.json` extension or a first non-blank character of `{` means a
/// session; anything else is a log index.
pub fn detect_kind(path: &Path, requested: InputKind) -> Result<InputKind> {
    if requested != InputKind::Auto {
        return Ok(requested);
    }

    let is_json_ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let kind = if is_json_ext || starts_with_object(path)? {
        InputKind::Session
    } else {
        InputKind::LogIndex
    };

    debug!(path = %path.display(), ?kind, "detected input kind");
    Ok(kind)
}

fn starts_with_object(path: &Path) -> Result<bool> {
    let file = File::open(path).map_err(|e| AnalyzeError::io(path, e))?;
    let mut reader = BufReader::new(file);

    loop {
        let buf = reader.fill_buf().map_err(|e| AnalyzeError::io(path, e))?;
        if buf.is_empty() {
            return Ok(false);
        }
        if let Some(&first) = buf.iter().find(|b| !b.is_ascii_whitespace()) {
            return Ok(first == b'{');
        }
        let consumed = buf.len();
        reader.consume(consumed);
    }
}

/// Report defaults for a resolved input kind
pub fn default_report_options(kind: InputKind) -> ReportOptions {
    match kind {
        InputKind::LogIndex => ReportOptions::log_index(),
        InputKind::Session | InputKind::Auto => ReportOptions::session(),
    }
}

/// Run the analyzer matching `kind`
pub fn analyze_input(path: &Path, kind: InputKind, marker: &str) -> Result<AttributeStats> {
    match kind {
        InputKind::LogIndex => LogScanner::new(marker).analyze_index(path),
        InputKind::Session | InputKind::Auto => Ok(Session::from_file(path)?.analyze()),
    }
}
