use crate::analyzers::types::{MonthMean, MonthlyMeanRow};
use crate::analyzers::utility::mean;
use crate::calendar::{month_name, month_number, year_month};
use crate::series::Series;
use std::collections::{BTreeMap, BTreeSet};

/// Mean value per `(year, month)` pair.
///
/// Keyed by month number, so iteration is always January..December within a
/// year regardless of the order rows arrived in. Pairs with no observations
/// are absent rather than zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonthlyAggregateTable {
    rows: BTreeMap<i32, BTreeMap<u32, f64>>,
}

impl MonthlyAggregateTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Years present, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.rows.keys().copied().collect()
    }

    /// Union of month numbers present in any year, calendar order.
    pub fn months(&self) -> Vec<u32> {
        let months: BTreeSet<u32> = self.rows.values().flat_map(|m| m.keys().copied()).collect();
        months.into_iter().collect()
    }

    /// Full names of [`Self::months`].
    pub fn month_names(&self) -> Vec<&'static str> {
        self.months().into_iter().filter_map(month_name).collect()
    }

    /// Mean for a year and full (or abbreviated) month name.
    pub fn get(&self, year: i32, month: &str) -> Option<f64> {
        let month = month_number(month)?;
        self.get_by_number(year, month)
    }

    pub fn get_by_number(&self, year: i32, month: u32) -> Option<f64> {
        self.rows.get(&year)?.get(&month).copied()
    }

    /// `(year, [(month number, mean)])` in year then calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, Vec<(u32, f64)>)> + '_ {
        self.rows
            .iter()
            .map(|(year, months)| (*year, months.iter().map(|(m, v)| (*m, *v)).collect()))
    }

    /// Number of `(year, month)` cells.
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    /// Serializable rows with month names attached.
    pub fn to_rows(&self) -> Vec<MonthlyMeanRow> {
        self.iter()
            .map(|(year, months)| MonthlyMeanRow {
                year,
                months: months
                    .into_iter()
                    .filter_map(|(m, mean)| {
                        Some(MonthMean {
                            month: month_name(m)?.to_string(),
                            mean,
                        })
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Groups the series by calendar year and month and averages each group.
pub fn monthly_means(series: &Series) -> MonthlyAggregateTable {
    let mut groups: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();

    for obs in series.iter() {
        groups
            .entry(year_month(obs.timestamp))
            .or_default()
            .push(obs.value);
    }

    let mut rows: BTreeMap<i32, BTreeMap<u32, f64>> = BTreeMap::new();
    for ((year, month), values) in groups {
        rows.entry(year).or_default().insert(month, mean(&values));
    }

    MonthlyAggregateTable { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{Observation, read_series};
    use chrono::{Datelike, Days, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Builds a series without trimming so tests control every value.
    fn untrimmed(observations: Vec<Observation>) -> Series {
        Series::from_observations(observations)
    }

    #[test]
    fn test_empty_series_gives_empty_table() {
        let series = read_series("date,value\n".as_bytes()).unwrap();
        let table = monthly_means(&series);
        assert!(table.is_empty());
        assert!(table.years().is_empty());
        assert!(table.months().is_empty());
        assert_eq!(table.cell_count(), 0);
    }

    #[test]
    fn test_months_in_calendar_order_regardless_of_insertion() {
        let series = untrimmed(vec![
            Observation::new(date(2018, 12, 1), 1.0),
            Observation::new(date(2018, 4, 1), 2.0),
            Observation::new(date(2018, 8, 1), 3.0),
            Observation::new(date(2018, 1, 1), 4.0),
        ]);
        let table = monthly_means(&series);

        assert_eq!(table.months(), vec![1, 4, 8, 12]);
        assert_eq!(
            table.month_names(),
            vec!["January", "April", "August", "December"]
        );
    }

    #[test]
    fn test_mean_per_pair() {
        let series = untrimmed(vec![
            Observation::new(date(2017, 3, 1), 10.0),
            Observation::new(date(2017, 3, 15), 20.0),
            Observation::new(date(2017, 4, 1), 5.0),
            Observation::new(date(2018, 3, 1), 100.0),
        ]);
        let table = monthly_means(&series);

        assert_eq!(table.get(2017, "March"), Some(15.0));
        assert_eq!(table.get(2017, "Apr"), Some(5.0));
        assert_eq!(table.get(2018, "March"), Some(100.0));
        assert_eq!(table.get(2018, "April"), None);
        assert_eq!(table.years(), vec![2017, 2018]);
        assert_eq!(table.cell_count(), 3);
    }

    #[test]
    fn test_hundred_values_over_two_years() {
        // 1..=100, one per week starting 2016-01-04
        let start = date(2016, 1, 4);
        let observations: Vec<Observation> = (0..100u64)
            .map(|i| Observation::new(start + Days::new(i * 7), (i + 1) as f64))
            .collect();
        let series = untrimmed(observations.clone());
        let table = monthly_means(&series);

        let mut expected: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
        for o in &observations {
            expected
                .entry((o.timestamp.year(), o.timestamp.month()))
                .or_default()
                .push(o.value);
        }

        assert_eq!(table.cell_count(), expected.len());
        for ((year, month), values) in expected {
            let want = values.iter().sum::<f64>() / values.len() as f64;
            assert_eq!(table.get_by_number(year, month), Some(want));
        }
    }

    #[test]
    fn test_to_rows_names_months() {
        let series = untrimmed(vec![
            Observation::new(date(2019, 2, 1), 4.0),
            Observation::new(date(2019, 1, 1), 2.0),
        ]);
        let rows = monthly_means(&series).to_rows();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year, 2019);
        assert_eq!(rows[0].months[0].month, "January");
        assert_eq!(rows[0].months[1].month, "February");
        assert_eq!(rows[0].months[1].mean, 4.0);
    }
}
