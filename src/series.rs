//! CSV loading and percentile trimming for the daily page-view series.
//!
//! The input is a comma-delimited file with a header row and the columns
//! `date` and `value`. Every row must parse; the first bad row aborts the
//! load with an error naming the line.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::utility::{percentile, sorted};

/// Lower edge of the retained band.
pub const LOWER_QUANTILE: f64 = 0.025;
/// Upper edge of the retained band.
pub const UPPER_QUANTILE: f64 = 0.975;

/// A single day of the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    pub timestamp: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(timestamp: NaiveDate, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Row as it appears in the CSV, before date parsing.
#[derive(Debug, Deserialize)]
struct RawRow {
    date: String,
    value: f64,
}

/// Percentile band computed over the unfiltered values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub lower: f64,
    pub upper: f64,
}

impl Thresholds {
    /// Returns `None` when there is nothing to compute a band over.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sorted = sorted(values);
        Some(Self {
            lower: percentile(&sorted, LOWER_QUANTILE),
            upper: percentile(&sorted, UPPER_QUANTILE),
        })
    }

    /// Closed-interval membership.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// The trimmed series shared by every chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Series {
    observations: Vec<Observation>,
    thresholds: Option<Thresholds>,
    original_len: usize,
}

impl Series {
    /// Wraps observations that are already clean; no band is applied.
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        Self {
            original_len: observations.len(),
            observations,
            thresholds: None,
        }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Band used for trimming; `None` for an empty input.
    pub fn thresholds(&self) -> Option<Thresholds> {
        self.thresholds
    }

    /// Number of rows read before trimming.
    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// Share of the original rows that survived trimming, 0.0 when nothing was read.
    pub fn retained_ratio(&self) -> f64 {
        if self.original_len == 0 {
            0.0
        } else {
            self.observations.len() as f64 / self.original_len as f64
        }
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.timestamp)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.timestamp)
    }
}

/// Drops every observation outside `[P2.5, P97.5]` of `observations`.
///
/// Source order is preserved.
pub fn trim_outliers(observations: Vec<Observation>) -> Series {
    let original_len = observations.len();
    let values: Vec<f64> = observations.iter().map(|o| o.value).collect();
    let thresholds = Thresholds::from_values(&values);

    let observations = match thresholds {
        Some(band) => observations
            .into_iter()
            .filter(|o| band.contains(o.value))
            .collect(),
        None => observations,
    };

    Series {
        observations,
        thresholds,
        original_len,
    }
}

/// Parses `date` as a plain ISO date, an RFC 3339 timestamp, or a naive
/// timestamp. Only the calendar date is kept.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .map(|ts| ts.date())
}

/// Reads every row from `reader` and trims outliers.
///
/// # Errors
///
/// Returns an error on the first malformed row, unparseable date, or
/// non-finite value. A header-only input yields an empty series.
pub fn read_series<R: Read>(reader: R) -> Result<Series> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let mut observations = Vec::new();
    for (i, row) in rdr.deserialize::<RawRow>().enumerate() {
        // header is line 1
        let line = i + 2;
        let row = row.with_context(|| format!("malformed row at line {}", line))?;

        let Some(timestamp) = parse_date(&row.date) else {
            bail!("unparseable date {:?} at line {}", row.date, line);
        };
        if !row.value.is_finite() {
            bail!("non-numeric value {} at line {}", row.value, line);
        }

        observations.push(Observation::new(timestamp, row.value));
    }

    debug!(rows = observations.len(), "Rows parsed");
    Ok(trim_outliers(observations))
}

/// Loads the series from a CSV file on disk.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_series(path: &Path) -> Result<Series> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let series = read_series(file).with_context(|| format!("failed to read {}", path.display()))?;

    match series.thresholds() {
        Some(band) => info!(
            original = series.original_len(),
            retained = series.len(),
            lower = band.lower,
            upper = band.upper,
            "Series loaded and trimmed"
        ),
        None => info!("Series is empty"),
    }

    Ok(series)
}
