use crate::analyzers::types::GroupSummary;
use crate::analyzers::utility::{percentile, sorted};
use crate::calendar::{MONTH_ABBREVIATIONS, month_abbreviation, month_number, year_month};
use crate::series::Series;
use serde::Serialize;
use std::collections::BTreeMap;

/// Values grouped by calendar year and, separately, by month of year.
///
/// Month groups are keyed by month number so they come out Jan..Dec, never
/// alphabetically.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DistributionGroups {
    by_year: BTreeMap<i32, Vec<f64>>,
    by_month: BTreeMap<u32, Vec<f64>>,
}

impl DistributionGroups {
    pub fn is_empty(&self) -> bool {
        self.by_year.is_empty()
    }

    /// Year groups, ascending.
    pub fn by_year(&self) -> impl Iterator<Item = (i32, &[f64])> + '_ {
        self.by_year.iter().map(|(y, v)| (*y, v.as_slice()))
    }

    /// Month groups that have at least one value, keyed by abbreviation.
    pub fn by_month(&self) -> impl Iterator<Item = (&'static str, &[f64])> + '_ {
        self.by_month
            .iter()
            .filter_map(|(m, v)| Some((month_abbreviation(*m)?, v.as_slice())))
    }

    /// All twelve month slots, Jan..Dec; missing months are empty.
    pub fn month_slots(&self) -> Vec<(&'static str, &[f64])> {
        MONTH_ABBREVIATIONS
            .iter()
            .enumerate()
            .map(|(i, abbr)| {
                let values = self
                    .by_month
                    .get(&(i as u32 + 1))
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                (*abbr, values)
            })
            .collect()
    }

    pub fn year(&self, year: i32) -> Option<&[f64]> {
        self.by_year.get(&year).map(Vec::as_slice)
    }

    /// Values for a month given by full name or abbreviation.
    pub fn month(&self, name: &str) -> Option<&[f64]> {
        self.by_month.get(&month_number(name)?).map(Vec::as_slice)
    }

    pub fn year_summaries(&self) -> Vec<GroupSummary> {
        self.by_year()
            .filter_map(|(year, values)| GroupSummary::new(year.to_string(), values))
            .collect()
    }

    pub fn month_summaries(&self) -> Vec<GroupSummary> {
        self.by_month()
            .filter_map(|(abbr, values)| GroupSummary::new(abbr.to_string(), values))
            .collect()
    }
}

/// Groups the series for the trend (year) and seasonality (month) box plots.
pub fn distribution_groups(series: &Series) -> DistributionGroups {
    let mut groups = DistributionGroups::default();

    for obs in series.iter() {
        let (year, month) = year_month(obs.timestamp);
        groups.by_year.entry(year).or_default().push(obs.value);
        groups.by_month.entry(month).or_default().push(obs.value);
    }

    groups
}

/// Order statistics behind one box of a box plot.
///
/// Whiskers reach the most extreme values within 1.5 × IQR of the box;
/// anything further out is listed in `outliers`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    pub const WHISKER_IQR: f64 = 1.5;

    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let sorted = sorted(values);
        let q1 = percentile(&sorted, 0.25);
        let median = percentile(&sorted, 0.5);
        let q3 = percentile(&sorted, 0.75);

        let reach = Self::WHISKER_IQR * (q3 - q1);
        let low_fence = q1 - reach;
        let high_fence = q3 + reach;

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|v| *v >= low_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= high_fence)
            .unwrap_or(q3);

        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < lower_whisker || *v > upper_whisker)
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}
