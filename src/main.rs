//! CLI entry point for the time-series visualizer.
//!
//! Loads the page-view CSV once, trims outliers, and renders the line, bar
//! and box plots or prints a JSON summary of the aggregates.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use time_series_visualizer::analyzers::aggregate::monthly_means;
use time_series_visualizer::analyzers::analyzer::summarize;
use time_series_visualizer::{
    output::{print_json, print_pretty, write_monthly_csv},
    plots::{draw_bar_plot, draw_box_plot, draw_line_plot},
    series::load_series,
};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "time_series_visualizer")]
#[command(about = "Plot a daily page-view series by time and calendar period", long_about = None)]
struct Cli {
    /// CSV file with `date` and `value` columns
    #[arg(short, long, global = true, default_value = "fcc-forum-pageviews.csv")]
    input: PathBuf,

    /// Directory the PNG files are written to
    #[arg(short, long, global = true, default_value = ".")]
    output_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw daily values over time (line_plot.png)
    Line,
    /// Draw monthly averages grouped by year (bar_plot.png)
    Bar,
    /// Draw year-wise and month-wise box plots (box_plot.png)
    Box,
    /// Draw all three charts
    All,
    /// Log the filter report, monthly means and box statistics as JSON
    Summary {
        /// Also write the monthly means to this CSV file
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/time_series_visualizer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("time_series_visualizer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let series = load_series(&cli.input)?;
    let out_dir = cli.output_dir.as_path();

    match cli.command {
        Commands::Line => {
            draw_line_plot(&series, out_dir)?;
        }
        Commands::Bar => {
            draw_bar_plot(&series, out_dir)?;
        }
        Commands::Box => {
            draw_box_plot(&series, out_dir)?;
        }
        Commands::All => {
            let figures = [
                draw_line_plot(&series, out_dir)?,
                draw_bar_plot(&series, out_dir)?,
                draw_box_plot(&series, out_dir)?,
            ];
            info!(
                charts = figures.len(),
                output_dir = %out_dir.display(),
                "All charts written"
            );
        }
        Commands::Summary { csv } => {
            let report = summarize(&series);
            print_pretty(&report);
            print_json(&report)?;

            if let Some(path) = csv {
                write_monthly_csv(&path, &monthly_means(&series))?;
                info!(path = %path.display(), "Monthly means written");
            }
        }
    }

    Ok(())
}
