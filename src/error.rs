//! Error types for session and log analysis
//!
//! Every variant is fatal: the binary reports it and exits non-zero.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or analyzing input files
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `path` is `None` when the session came from in-memory text
    #[error("Malformed session{}: {source}", location(.path))]
    Session {
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },
}

fn location(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|path| format!(" file {}", path.display()))
        .unwrap_or_default()
}

impl AnalyzeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzeError>;
