//! Text report for attribute statistics
//!
//! Layout:
//!
//! ```text
//! --- Stats ---
//! Total attributes: 4
//! Total queries: 2
//! --- Depth	Count	% ---
//! 0	2	50.00%
//! --- Attribute	Count ---
//! /a	3	75.00%
//! ---- Top-5: 4 (100.00%)----
//! --- Functions ---
//! ExistsPredicate	4	100.00%
//! ```
//!
//! All percentages are relative to `total_count`.

use crate::stats::{percent_of, AttributeStats};
use std::fmt;

/// Ranks after which a cumulative Top-K line is printed
pub const DEFAULT_CUTOFFS: [usize; 3] = [5, 10, 20];

/// Attributes seen fewer times than this are hidden in log reports
pub const LOG_MIN_ATTRIBUTE_COUNT: u64 = 4;

/// What the report shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// 1-based ranks that get a cumulative marker
    pub cutoffs: Vec<usize>,
    /// Attribute rows with a smaller count are not printed
    pub min_attribute_count: u64,
    /// Print the predicate type table
    pub show_types: bool,
    /// Print the scanned file total
    pub show_files: bool,
}

impl ReportOptions {
    /// Session input: every attribute and the type table
    pub fn session() -> Self {
        Self {
            cutoffs: DEFAULT_CUTOFFS.to_vec(),
            min_attribute_count: 0,
            show_types: true,
            show_files: false,
        }
    }

    /// Log input: rare attributes hidden, file total shown
    pub fn log_index() -> Self {
        Self {
            cutoffs: DEFAULT_CUTOFFS.to_vec(),
            min_attribute_count: LOG_MIN_ATTRIBUTE_COUNT,
            show_types: false,
            show_files: true,
        }
    }
}

/// A renderable report; use `to_string()` or `{}` to produce the text
#[derive(Debug)]
pub struct Report<'a> {
    stats: &'a AttributeStats,
    options: &'a ReportOptions,
}

impl<'a> Report<'a> {
    pub fn new(stats: &'a AttributeStats, options: &'a ReportOptions) -> Self {
        Self { stats, options }
    }

    fn write_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Stats ---")?;
        writeln!(f, "Total attributes: {}", self.stats.total_count)?;
        writeln!(f, "Total queries: {}", self.stats.total_queries)?;
        if self.options.show_files {
            writeln!(f, "Total files: {}", self.stats.total_files.unwrap_or(0))?;
        }
        Ok(())
    }

    fn write_depths(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.stats.total_count;
        writeln!(f, "--- Depth\tCount\t% ---")?;
        for (depth, count) in self.stats.depths.sorted_by_key() {
            writeln!(f, "{}\t{}\t{:.2}%", depth, count, percent_of(count, total))?;
        }
        Ok(())
    }

    fn write_attributes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.stats.total_count;
        let attributes = &self.stats.attributes;
        writeln!(f, "--- Attribute\tCount ---")?;

        for (i, (attribute, count)) in attributes.sorted_by_count().into_iter().enumerate() {
            let rank = i + 1;
            if count >= self.options.min_attribute_count {
                writeln!(f, "{}\t{}\t{:.2}%", attribute, count, percent_of(count, total))?;
            }

            // Hidden rows still advance the rank and count towards the marker
            if self.options.cutoffs.contains(&rank) {
                let top = attributes.top_k_cumulative(rank);
                writeln!(
                    f,
                    "---- Top-{}: {} ({:.2}%)----",
                    rank,
                    top,
                    percent_of(top, total)
                )?;
            }
        }
        Ok(())
    }

    fn write_types(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.stats.total_count;
        writeln!(f, "--- Functions ---")?;
        for (kind, count) in self.stats.types.sorted_by_count() {
            writeln!(f, "{}\t{}\t{:.2}%", kind, count, percent_of(count, total))?;
        }
        Ok(())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_summary(f)?;
        self.write_depths(f)?;
        self.write_attributes(f)?;
        if self.options.show_types {
            self.write_types(f)?;
        }
        Ok(())
    }
}

/// Render `stats` as report text
pub fn render(stats: &AttributeStats, options: &ReportOptions) -> String {
    Report::new(stats, options).to_string()
}
