//! Querystat - attribute frequency statistics for query workloads
//!
//! This library flattens boolean predicate trees from query session files,
//! extracts quoted attributes from query logs, and aggregates attribute,
//! depth and predicate-type counts into a text report.

pub mod analyze;
pub mod cli;
pub mod config;
pub mod error;
pub mod json;
pub mod log_scan;
pub mod predicate;
pub mod report;
pub mod session;
pub mod stats;
