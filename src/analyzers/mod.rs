//! Aggregation of the trimmed series.
//!
//! Monthly means drive the bar chart, year and month groupings drive the
//! box plots, and the summary report bundles both for JSON output.

pub mod aggregate;
pub mod analyzer;
pub mod distribution;
pub mod types;
pub mod utility;
