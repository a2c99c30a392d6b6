//! Output formatting and persistence for the summary report.
//!
//! Supports pretty-printing, JSON logging, and a long-format CSV of the
//! monthly means.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::aggregate::MonthlyAggregateTable;
use crate::analyzers::types::SummaryReport;
use crate::calendar::month_name;
use csv::Writer;
use std::path::Path;

/// One `(year, month, mean)` line of the monthly means CSV.
#[derive(Debug, Serialize)]
struct MonthlyMeanRecord<'a> {
    year: i32,
    month: &'a str,
    mean: f64,
}

/// Logs the report using Rust's debug pretty-print format.
pub fn print_pretty(report: &SummaryReport) {
    debug!("{:#?}", report);
}

/// Logs the report as pretty-printed JSON.
pub fn print_json(report: &SummaryReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes the monthly mean table to `path` as `year,month,mean` rows.
///
/// Overwrites any existing file; rows follow year then calendar order.
pub fn write_monthly_csv(path: &Path, table: &MonthlyAggregateTable) -> Result<()> {
    debug!(path = %path.display(), cells = table.cell_count(), "Writing monthly means CSV");

    let mut writer =
        Writer::from_path(path).with_context(|| format!("failed to create {}", path.display()))?;

    // serialize() only emits a header with the first record
    if table.is_empty() {
        writer.write_record(["year", "month", "mean"])?;
    }

    for (year, months) in table.iter() {
        for (month, mean) in months {
            let Some(month) = month_name(month) else {
                continue;
            };
            writer.serialize(MonthlyMeanRecord { year, month, mean })?;
        }
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::aggregate::monthly_means;
    use crate::analyzers::analyzer::summarize;
    use crate::series::read_series;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(name)
    }

    fn sample_report() -> SummaryReport {
        let series = read_series("date,value\n2018-01-01,3\n2018-02-01,3\n".as_bytes()).unwrap();
        summarize(&series)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample_report());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_report()).unwrap();
    }

    #[test]
    fn test_write_monthly_csv_rows_in_calendar_order() {
        let path = temp_path("time_series_visualizer_test_monthly.csv");
        let _ = fs::remove_file(&path);

        // equal values so the percentile trim keeps every row
        let input = "date,value\n\
                     2018-03-01,10\n\
                     2018-01-01,10\n\
                     2018-01-02,10\n\
                     2017-12-01,10\n";
        let series = read_series(input.as_bytes()).unwrap();
        write_monthly_csv(&path, &monthly_means(&series)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "year,month,mean");
        assert!(lines[1].starts_with("2017,December"));
        assert!(lines[2].starts_with("2018,January"));
        assert!(lines[3].starts_with("2018,March"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_monthly_csv_empty_table_has_header() {
        let path = temp_path("time_series_visualizer_test_monthly_empty.csv");
        let _ = fs::remove_file(&path);

        write_monthly_csv(&path, &MonthlyAggregateTable::default()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().collect::<Vec<_>>(), vec!["year,month,mean"]);

        fs::remove_file(&path).unwrap();
    }
}
