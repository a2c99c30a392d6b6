//! Description of a rendered chart, returned by every `draw_*` call.
//!
//! A [`Figure`] records what was put on the image (labels, legend, plotted
//! data) so callers and tests can inspect a chart without decoding the PNG.

use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;

use crate::analyzers::distribution::BoxSummary;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub axes: Vec<Axes>,
}

impl Figure {
    /// Title of the first panel, if any.
    pub fn title(&self) -> Option<&str> {
        self.axes.first().and_then(|a| a.title.as_deref())
    }
}

/// One panel of a figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axes {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    /// Category tick labels; empty when the axis picks its own ticks.
    pub x_tick_labels: Vec<String>,
    pub legend: Option<Legend>,
    pub content: PlotContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: String,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlotContent {
    Line { points: Vec<(NaiveDate, f64)> },
    Bars { groups: Vec<BarGroup> },
    Boxes { boxes: Vec<BoxSlot> },
}

impl PlotContent {
    /// Number of drawn marks: line points, bars, or non-empty boxes.
    pub fn mark_count(&self) -> usize {
        match self {
            PlotContent::Line { points } => points.len(),
            PlotContent::Bars { groups } => groups.iter().map(|g| g.bars.len()).sum(),
            PlotContent::Boxes { boxes } => boxes.iter().filter(|b| b.summary.is_some()).count(),
        }
    }
}

/// Bars sharing one x position (one year).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGroup {
    pub label: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    /// Index into the legend, which fixes the bar's slot within its group.
    pub series: usize,
    /// Calendar month (1-based); picks the bar's color.
    pub month: u32,
    pub label: String,
    pub value: f64,
}

/// One category slot of a box plot; `summary` is `None` for an empty group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSlot {
    pub label: String,
    pub summary: Option<BoxSummary>,
}
