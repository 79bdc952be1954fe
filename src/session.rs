//! Query session files
//!
//! A session is the JSON document a query generator writes out:
//!
//! ```json
//! {
//!   "config": "...",
//!   "queries": [
//!     {"load": "twitter", "filter": {"type": "ExistsPredicate", "parameter": {"Path": "/id"}},
//!      "store": "twitter_1"}
//!   ]
//! }
//! ```
//!
//! Only `queries[].filter` feeds the statistics; the other keys are parsed
//! so malformed sessions fail early and so debug logs can name datasets.

use crate::error::{AnalyzeError, Result};
use crate::json;
use crate::predicate::Predicate;
use crate::stats::AttributeStats;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// A parsed session document
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    /// Generator configuration the session was produced with
    #[serde(default)]
    pub config: Option<String>,
    pub queries: Vec<SessionQuery>,
}

/// One query of a session
#[derive(Debug, Clone, Deserialize)]
pub struct SessionQuery {
    /// Dataset the query loads from
    #[serde(default)]
    pub load: Option<String>,
    pub filter: Predicate,
    /// Aggregation, kept verbatim
    #[serde(default)]
    pub agg: Option<Value>,
    /// Dataset the result is stored as
    #[serde(default)]
    pub store: Option<String>,
}

impl Session {
    /// Load a session from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| AnalyzeError::io(path, e))?;
        Self::parse(&content, Some(path))
    }

    /// Parse a session from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::parse(content, None)
    }

    fn parse(content: &str, path: Option<&Path>) -> Result<Self> {
        json::from_str_unbounded(content).map_err(|source| AnalyzeError::Session {
            path: path.map(Path::to_path_buf),
            source,
        })
    }

    /// Flatten every query's filter into `stats`
    pub fn analyze_into(&self, stats: &mut AttributeStats) {
        for (i, query) in self.queries.iter().enumerate() {
            debug!(
                query = i,
                load = query.load.as_deref().unwrap_or(""),
                store = query.store.as_deref().unwrap_or(""),
                depth = query.filter.depth(),
                "filter: {}",
                query.filter
            );

            for leaf in query.filter.leaves() {
                stats.record_leaf(leaf.kind(), leaf.path());
            }
            stats.record_query();
        }
    }

    /// Statistics over every query in the session
    pub fn analyze(&self) -> AttributeStats {
        let mut stats = AttributeStats::new();
        self.analyze_into(&mut stats);
        info!(
            queries = stats.total_queries,
            leaves = stats.total_count,
            "analyzed session"
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SESSION: &str = r#"{
        "config": "seed=1",
        "queries": [
            {
                "load": "twitter",
                "filter": {"type": "AndPredicate", "parameter": {
                    "Lhs": {"type": "Eq", "parameter": {"Path": "a/b"}},
                    "Rhs": {"type": "Eq", "parameter": {"Path": "c"}}
                }},
                "store": "twitter_1"
            },
            {
                "filter": {"type": "NotPredicate", "parameter":
                    {"type": "TruePredicate", "parameter": null}},
                "agg": {"type": "CountAggregation", "parameter": {}}
            }
        ]
    }"#;

    #[test]
    fn test_parse_session() {
        let session = Session::from_json_str(SESSION).unwrap();
        assert_eq!(session.config.as_deref(), Some("seed=1"));
        assert_eq!(session.queries.len(), 2);
        assert_eq!(session.queries[0].load.as_deref(), Some("twitter"));
        assert_eq!(session.queries[0].store.as_deref(), Some("twitter_1"));
        assert!(session.queries[1].agg.is_some());
    }

    #[test]
    fn test_analyze_counts_leaves_and_queries() {
        let stats = Session::from_json_str(SESSION).unwrap().analyze();

        assert_eq!(stats.total_queries, 2);
        assert_eq!(stats.total_count, 3);
        assert_eq!(stats.types.get(&"Eq".to_string()), 2);
        assert_eq!(stats.types.get(&"TruePredicate".to_string()), 1);
        assert_eq!(stats.attributes.get(&"a/b".to_string()), 1);
        assert_eq!(stats.attributes.get(&"c".to_string()), 1);
        assert_eq!(stats.depths.get(&1), 1);
        assert_eq!(stats.depths.get(&0), 1);
        assert_eq!(stats.total_files, None);
    }

    #[test]
    fn test_combinators_are_not_counted_as_types() {
        let stats = Session::from_json_str(SESSION).unwrap().analyze();
        assert_eq!(stats.types.get(&"AndPredicate".to_string()), 0);
        assert_eq!(stats.types.get(&"NotPredicate".to_string()), 0);
    }

    #[test]
    fn test_missing_queries_is_error() {
        assert!(Session::from_json_str(r#"{"config": "x"}"#).is_err());
    }

    #[test]
    fn test_missing_filter_is_error() {
        assert!(Session::from_json_str(r#"{"queries": [{"load": "x"}]}"#).is_err());
    }

    #[test]
    fn test_empty_session() {
        let stats = Session::from_json_str(r#"{"queries": []}"#)
            .unwrap()
            .analyze();
        assert_eq!(stats.total_queries, 0);
        assert_eq!(stats.total_count, 0);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SESSION.as_bytes()).unwrap();

        let session = Session::from_file(file.path()).unwrap();
        assert_eq!(session.queries.len(), 2);
    }

    #[test]
    fn test_from_file_malformed_names_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{\"queries\": [").unwrap();

        let err = Session::from_file(file.path()).unwrap_err();
        assert!(matches!(err, AnalyzeError::Session { .. }));
        assert!(err
            .to_string()
            .contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_malformed_text_has_no_path() {
        let err = Session::from_json_str("{\"queries\": [").unwrap_err();
        assert!(matches!(err, AnalyzeError::Session { path: None, .. }));
        assert!(err.to_string().starts_with("Malformed session: "));
    }

    #[test]
    fn test_leaf_without_parameter_is_error() {
        let err = Session::from_json_str(
            r#"{"queries": [{"filter": {"type": "ExistsPredicate"}}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("ExistsPredicate is missing its `parameter`"));
    }

    #[test]
    fn test_deeply_nested_filter() {
        let leaf = r#"{"type": "IsStringPredicate", "parameter": {"Path": "/a/b"}}"#;
        let mut filter = leaf.to_string();
        for i in 0..500 {
            filter = if i % 2 == 0 {
                format!(r#"{{"type": "NotPredicate", "parameter": {}}}"#, filter)
            } else {
                format!(
                    r#"{{"type": "AndPredicate", "parameter": {{"Lhs": {}, "Rhs": {}}}}}"#,
                    filter, leaf
                )
            };
        }
        let session = format!(r#"{{"queries": [{{"filter": {}}}]}}"#, filter);

        let stats = Session::from_json_str(&session).unwrap().analyze();
        assert_eq!(stats.total_queries, 1);
        assert_eq!(stats.total_count, 251);
        assert_eq!(stats.depths.get(&2), 251);
        assert_eq!(stats.types.get(&"IsStringPredicate".to_string()), 251);
    }

    #[test]
    fn test_from_file_missing() {
        let err = Session::from_file("/nonexistent/session.json").unwrap_err();
        assert!(matches!(err, AnalyzeError::Io { .. }));
    }
}
