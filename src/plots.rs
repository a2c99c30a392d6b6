//! Line, bar and box plot rendering.
//!
//! Each chart is described first by a pure `*_figure` builder and then drawn
//! from that description with the [`plotters`] bitmap backend, so the
//! returned [`Figure`] always matches the image on disk. File names and image
//! sizes are fixed.

use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;
use std::path::Path;
use tracing::info;

use crate::analyzers::aggregate::monthly_means;
use crate::analyzers::distribution::{BoxSummary, distribution_groups};
use crate::calendar::{month_name, month_number};
use crate::figure::{Axes, Bar, BarGroup, BoxSlot, Figure, Legend, PlotContent};
use crate::series::Series;

pub const LINE_PLOT_FILE: &str = "line_plot.png";
pub const BAR_PLOT_FILE: &str = "bar_plot.png";
pub const BOX_PLOT_FILE: &str = "box_plot.png";

pub const LINE_PLOT_SIZE: (u32, u32) = (1200, 600);
pub const BAR_PLOT_SIZE: (u32, u32) = (1000, 600);
pub const BOX_PLOT_SIZE: (u32, u32) = (1600, 600);

const LINE_TITLE_PREFIX: &str = "Daily freeCodeCamp Forum Page Views";
const YEAR_BOX_TITLE: &str = "Year-wise Box Plot (Trend)";
const MONTH_BOX_TITLE: &str = "Month-wise Box Plot (Seasonality)";
const PAGE_VIEWS: &str = "Page Views";

const FONT: &str = "sans-serif";
const BOX_HALF_WIDTH: f64 = 0.3;

/// Fill color of a month's bars, fixed per calendar month.
pub fn month_color(month: u32) -> RGBAColor {
    Palette99::pick(month.saturating_sub(1) as usize).to_rgba()
}

/// Converts a plotters error into an `anyhow` error.
fn plot_err<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow::anyhow!("plotting error: {}", e)
}

/// Title spanning the first and last month of the series, e.g. `5/2016-12/2019`.
fn line_title(series: &Series) -> String {
    match (series.first_date(), series.last_date()) {
        (Some(first), Some(last)) => format!(
            "{} {}/{}-{}/{}",
            LINE_TITLE_PREFIX,
            first.month(),
            first.year(),
            last.month(),
            last.year()
        ),
        _ => LINE_TITLE_PREFIX.to_string(),
    }
}

/// Daily values over time as a single red line.
pub fn line_figure(series: &Series, out_dir: &Path) -> Figure {
    let points = series.iter().map(|o| (o.timestamp, o.value)).collect();

    Figure {
        path: out_dir.join(LINE_PLOT_FILE),
        width: LINE_PLOT_SIZE.0,
        height: LINE_PLOT_SIZE.1,
        axes: vec![Axes {
            title: Some(line_title(series)),
            x_label: "Date".to_string(),
            y_label: PAGE_VIEWS.to_string(),
            x_tick_labels: Vec::new(),
            legend: None,
            content: PlotContent::Line { points },
        }],
    }
}

/// Monthly means grouped by year, one colored bar per month.
pub fn bar_figure(series: &Series, out_dir: &Path) -> Figure {
    let table = monthly_means(series);
    let months = table.months();

    let groups: Vec<BarGroup> = table
        .iter()
        .map(|(year, cells)| BarGroup {
            label: year.to_string(),
            bars: cells
                .into_iter()
                .filter_map(|(month, value)| {
                    let idx = months.iter().position(|m| *m == month)?;
                    Some(Bar {
                        series: idx,
                        month,
                        label: month_name(month)?.to_string(),
                        value,
                    })
                })
                .collect(),
        })
        .collect();

    Figure {
        path: out_dir.join(BAR_PLOT_FILE),
        width: BAR_PLOT_SIZE.0,
        height: BAR_PLOT_SIZE.1,
        axes: vec![Axes {
            title: None,
            x_label: "Years".to_string(),
            y_label: "Average Page Views".to_string(),
            x_tick_labels: groups.iter().map(|g| g.label.clone()).collect(),
            legend: Some(Legend {
                title: "Months".to_string(),
                labels: table.month_names().into_iter().map(String::from).collect(),
            }),
            content: PlotContent::Bars { groups },
        }],
    }
}

/// Side-by-side distributions by year (trend) and by month (seasonality).
pub fn box_figure(series: &Series, out_dir: &Path) -> Figure {
    let groups = distribution_groups(series);

    let year_boxes: Vec<BoxSlot> = groups
        .by_year()
        .map(|(year, values)| BoxSlot {
            label: year.to_string(),
            summary: BoxSummary::from_values(values),
        })
        .collect();
    let month_boxes: Vec<BoxSlot> = groups
        .month_slots()
        .into_iter()
        .map(|(abbr, values)| BoxSlot {
            label: abbr.to_string(),
            summary: BoxSummary::from_values(values),
        })
        .collect();

    let panel = |title: &str, x_label: &str, boxes: Vec<BoxSlot>| Axes {
        title: Some(title.to_string()),
        x_label: x_label.to_string(),
        y_label: PAGE_VIEWS.to_string(),
        x_tick_labels: boxes.iter().map(|b| b.label.clone()).collect(),
        legend: None,
        content: PlotContent::Boxes { boxes },
    };

    Figure {
        path: out_dir.join(BOX_PLOT_FILE),
        width: BOX_PLOT_SIZE.0,
        height: BOX_PLOT_SIZE.1,
        axes: vec![
            panel(YEAR_BOX_TITLE, "Year", year_boxes),
            panel(MONTH_BOX_TITLE, "Month", month_boxes),
        ],
    }
}

/// Renders the line plot to `out_dir/line_plot.png`.
#[tracing::instrument(skip(series), fields(observations = series.len()))]
pub fn draw_line_plot(series: &Series, out_dir: &Path) -> Result<Figure> {
    let figure = line_figure(series, out_dir);
    render(&figure, render_line)?;
    Ok(figure)
}

/// Renders the bar plot to `out_dir/bar_plot.png`.
#[tracing::instrument(skip(series), fields(observations = series.len()))]
pub fn draw_bar_plot(series: &Series, out_dir: &Path) -> Result<Figure> {
    let figure = bar_figure(series, out_dir);
    render(&figure, render_bars)?;
    Ok(figure)
}

/// Renders both box plots to `out_dir/box_plot.png`.
#[tracing::instrument(skip(series), fields(observations = series.len()))]
pub fn draw_box_plot(series: &Series, out_dir: &Path) -> Result<Figure> {
    let figure = box_figure(series, out_dir);
    render(&figure, render_boxes)?;
    Ok(figure)
}

type Root<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

fn render(figure: &Figure, draw: fn(&Root, &Figure) -> Result<()>) -> Result<()> {
    if let Some(dir) = figure.path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let root = BitMapBackend::new(&figure.path, (figure.width, figure.height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    draw(&root, figure).with_context(|| format!("failed to render {}", figure.path.display()))?;
    root.present().map_err(plot_err)?;

    info!(path = %figure.path.display(), "Chart written");
    Ok(())
}

/// Range over `values` with a little headroom; `0..1` when there are none.
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() {
        return 0.0..1.0;
    }
    let pad = ((hi - lo) * 0.05).max(1.0);
    (lo - pad)..(hi + pad)
}

/// Writes category labels under the x axis at the given backend coordinates.
fn draw_tick_labels(root: &Root, labels: Vec<((i32, i32), &str)>) -> Result<()> {
    let style = TextStyle::from((FONT, 15).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    for ((x, y), label) in labels {
        root.draw(&Text::new(label, (x, y + 6), style.clone()))
            .map_err(plot_err)?;
    }
    Ok(())
}

fn render_line(root: &Root, figure: &Figure) -> Result<()> {
    let axes = &figure.axes[0];
    let PlotContent::Line { points } = &axes.content else {
        bail!("line figure has no line data");
    };

    let start = points.first().map(|p| p.0).unwrap_or_default();
    let mut end = points.last().map(|p| p.0).unwrap_or(start);
    if end <= start {
        end = start.succ_opt().unwrap_or(start);
    }

    let mut chart = ChartBuilder::on(root)
        .caption(axes.title.as_deref().unwrap_or_default(), (FONT, 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(
            RangedDate::from(start..end),
            padded_range(points.iter().map(|p| p.1)),
        )
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc(axes.x_label.as_str())
        .y_desc(axes.y_label.as_str())
        .x_labels(10)
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m").to_string())
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &RED))
        .map_err(plot_err)?;

    Ok(())
}

fn render_bars(root: &Root, figure: &Figure) -> Result<()> {
    let axes = &figure.axes[0];
    let PlotContent::Bars { groups } = &axes.content else {
        bail!("bar figure has no bar data");
    };
    let legend = axes.legend.as_ref().map(|l| l.labels.as_slice()).unwrap_or(&[]);

    let slots = groups.len().max(1) as f64;
    let y_max = groups
        .iter()
        .flat_map(|g| g.bars.iter().map(|b| b.value))
        .fold(0.0, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..slots, 0.0..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(axes.x_label.as_str())
        .y_desc(axes.y_label.as_str())
        .x_label_formatter(&|_| String::new())
        .draw()
        .map_err(plot_err)?;

    // each year occupies [i, i + 1); bars share the middle 80%
    let bar_width = 0.8 / legend.len().max(1) as f64;
    for (series_idx, name) in legend.iter().enumerate() {
        let color = month_number(name)
            .map_or_else(|| Palette99::pick(series_idx).to_rgba(), month_color);
        let rects: Vec<_> = groups
            .iter()
            .enumerate()
            .flat_map(|(i, g)| {
                g.bars
                    .iter()
                    .filter(move |b| b.series == series_idx)
                    .map(move |b| {
                        let x0 = i as f64 + 0.1 + bar_width * series_idx as f64;
                        Rectangle::new([(x0, 0.0), (x0 + bar_width, b.value)], color.filled())
                    })
            })
            .collect();

        chart
            .draw_series(rects)
            .map_err(plot_err)?
            .label(name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    if !legend.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(plot_err)?;
    }

    let labels = groups
        .iter()
        .enumerate()
        .map(|(i, g)| (chart.backend_coord(&(i as f64 + 0.5, 0.0)), g.label.as_str()))
        .collect();
    draw_tick_labels(root, labels)
}

fn render_boxes(root: &Root, figure: &Figure) -> Result<()> {
    let (left, right) = root.split_horizontally((figure.width / 2) as i32);
    for (area, axes) in [left, right].iter().zip(&figure.axes) {
        render_box_panel(root, area, axes)?;
    }
    Ok(())
}

fn render_box_panel(root: &Root, area: &Root, axes: &Axes) -> Result<()> {
    let PlotContent::Boxes { boxes } = &axes.content else {
        bail!("box figure has no box data");
    };

    let extremes = boxes.iter().filter_map(|b| b.summary.as_ref()).flat_map(|s| {
        let lo = s.outliers.first().copied().unwrap_or(s.lower_whisker);
        let hi = s.outliers.last().copied().unwrap_or(s.upper_whisker);
        [lo.min(s.lower_whisker), hi.max(s.upper_whisker)]
    });
    let y_range = padded_range(extremes);

    let mut chart = ChartBuilder::on(area)
        .caption(axes.title.as_deref().unwrap_or_default(), (FONT, 22))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5..(boxes.len().max(1) as f64 - 0.5), y_range)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(axes.x_label.as_str())
        .y_desc(axes.y_label.as_str())
        .x_label_formatter(&|_| String::new())
        .draw()
        .map_err(plot_err)?;

    for (i, slot) in boxes.iter().enumerate() {
        let Some(s) = &slot.summary else { continue };
        let x = i as f64;
        let (l, r) = (x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);
        let fill = Palette99::pick(i).mix(0.6);

        chart
            .draw_series([
                Rectangle::new([(l, s.q1), (r, s.q3)], fill.filled()),
                Rectangle::new([(l, s.q1), (r, s.q3)], BLACK.stroke_width(1)),
            ])
            .map_err(plot_err)?;
        chart
            .draw_series([
                PathElement::new(vec![(l, s.median), (r, s.median)], BLACK.stroke_width(2)),
                PathElement::new(vec![(x, s.lower_whisker), (x, s.q1)], BLACK),
                PathElement::new(vec![(x, s.q3), (x, s.upper_whisker)], BLACK),
                PathElement::new(
                    vec![(x - 0.1, s.lower_whisker), (x + 0.1, s.lower_whisker)],
                    BLACK,
                ),
                PathElement::new(
                    vec![(x - 0.1, s.upper_whisker), (x + 0.1, s.upper_whisker)],
                    BLACK,
                ),
            ])
            .map_err(plot_err)?;
        chart
            .draw_series(
                s.outliers
                    .iter()
                    .map(|v| Circle::new((x, *v), 2, BLACK.filled())),
            )
            .map_err(plot_err)?;
    }

    let y_floor = chart.y_range().start;
    let labels = boxes
        .iter()
        .enumerate()
        .map(|(i, b)| (chart.backend_coord(&(i as f64, y_floor)), b.label.as_str()))
        .collect();
    draw_tick_labels(root, labels)
}
