use crate::analyzers::aggregate::monthly_means;
use crate::analyzers::distribution::distribution_groups;
use crate::analyzers::types::{FilterReport, SummaryReport};
use crate::series::Series;
use tracing::debug;

/// Builds the full summary report for a trimmed series.
#[tracing::instrument(skip(series), fields(observations = series.len()))]
pub fn summarize(series: &Series) -> SummaryReport {
    let thresholds = series.thresholds();
    let filter = FilterReport {
        original_count: series.original_len(),
        retained_count: series.len(),
        lower_threshold: thresholds.map(|t| t.lower),
        upper_threshold: thresholds.map(|t| t.upper),
        first_date: series.first_date(),
        last_date: series.last_date(),
    };

    let table = monthly_means(series);
    let groups = distribution_groups(series);
    debug!(
        cells = table.cell_count(),
        years = groups.by_year().count(),
        "Series summarized"
    );

    SummaryReport {
        filter,
        monthly_means: table.to_rows(),
        years: groups.year_summaries(),
        months: groups.month_summaries(),
    }
}
