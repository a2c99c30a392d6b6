//! Serializable report types produced by the analyzers.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analyzers::distribution::BoxSummary;

/// Mean of a single month within a year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthMean {
    pub month: String,
    pub mean: f64,
}

/// One year of the monthly mean table, months in calendar order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMeanRow {
    pub year: i32,
    pub months: Vec<MonthMean>,
}

/// Box-plot statistics for a single year or month group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group: String,
    pub count: usize,
    #[serde(flatten)]
    pub stats: BoxSummary,
}

impl GroupSummary {
    /// Returns `None` for an empty group.
    pub fn new(group: String, values: &[f64]) -> Option<Self> {
        let stats = BoxSummary::from_values(values)?;
        Some(Self {
            group,
            count: values.len(),
            stats,
        })
    }
}

/// What the percentile trim did to the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterReport {
    pub original_count: usize,
    pub retained_count: usize,
    pub lower_threshold: Option<f64>,
    pub upper_threshold: Option<f64>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// Everything the `summary` command reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub filter: FilterReport,
    pub monthly_means: Vec<MonthlyMeanRow>,
    pub years: Vec<GroupSummary>,
    pub months: Vec<GroupSummary>,
}
