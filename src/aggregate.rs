//! Aggregator
//!
//! Sums the three tables across all regions: totals at a date, day-over-day
//! deltas, and the cumulative series up to a date.
//!
//! At the first date there is no previous day; the previous day is taken to
//! be the date itself, so every delta there is zero.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::{Category, Dataset, DatasetResult, PerCategory};

/// One integer per category
pub type CategoryCounts = PerCategory<i64>;

/// One point of a cumulative curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub total: i64,
}

/// Per category, the summed total for each date up to and including a date
pub type CumulativeSeries = PerCategory<Vec<SeriesPoint>>;

/// Read-only aggregation over a dataset
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    dataset: &'a Dataset,
}

impl<'a> Aggregator<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Sum of each category's column at `date`
    pub fn totals(&self, date: NaiveDate) -> DatasetResult<CategoryCounts> {
        let index = self.dataset.index_of(date)?;
        Ok(self.totals_at(index))
    }

    /// `totals(date) - totals(previous date)`, zero at the first date
    pub fn deltas(&self, date: NaiveDate) -> DatasetResult<CategoryCounts> {
        let index = self.dataset.index_of(date)?;
        let previous = index.saturating_sub(1);

        let current = self.totals_at(index);
        let before = self.totals_at(previous);

        Ok(current.map(|c, total| total - before.get(c)))
    }

    /// Totals for every date from the first through `date`, in axis order
    pub fn cumulative_series(&self, date: NaiveDate) -> DatasetResult<CumulativeSeries> {
        let index = self.dataset.index_of(date)?;
        let dates = &self.dataset.dates()[..=index];

        Ok(PerCategory::from_fn(|category| {
            let table = self.dataset.table(category);
            dates
                .iter()
                .enumerate()
                .map(|(i, d)| SeriesPoint {
                    date: *d,
                    total: table.column_sum(i),
                })
                .collect()
        }))
    }

    fn totals_at(&self, index: usize) -> CategoryCounts {
        PerCategory::from_fn(|category: Category| self.dataset.table(category).column_sum(index))
    }
}

/// `1234567` → `1,234,567`
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Always signed: `+287`, `-12`, `+0`
pub fn format_delta(value: i64) -> String {
    if value < 0 {
        format_count(value)
    } else {
        format!("+{}", format_count(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::{dataset, day};
    use crate::dataset::DatasetError;

    #[test]
    fn test_totals() {
        let ds = dataset();
        let agg = Aggregator::new(&ds);

        let totals = agg.totals(day(24)).unwrap();
        assert_eq!(totals.confirmed, 941);
        assert_eq!(totals.deaths, 26);
        assert_eq!(totals.recovered, 33);
    }

    #[test]
    fn test_totals_non_negative_everywhere() {
        let ds = dataset();
        let agg = Aggregator::new(&ds);

        for date in ds.dates() {
            let totals = agg.totals(*date).unwrap();
            for (_, value) in totals.iter() {
                assert!(*value >= 0);
            }
        }
    }

    #[test]
    fn test_deltas_example() {
        let ds = dataset();
        let agg = Aggregator::new(&ds);

        assert_eq!(agg.deltas(day(24)).unwrap().confirmed, 287);
        assert_eq!(agg.deltas(day(23)).unwrap().confirmed, 99);
    }

    #[test]
    fn test_deltas_match_totals_difference() {
        let ds = dataset();
        let agg = Aggregator::new(&ds);

        for pair in ds.dates().windows(2) {
            let deltas = agg.deltas(pair[1]).unwrap();
            let now = agg.totals(pair[1]).unwrap();
            let before = agg.totals(pair[0]).unwrap();
            for category in Category::all() {
                assert_eq!(
                    *deltas.get(*category),
                    now.get(*category) - before.get(*category)
                );
            }
        }
    }

    #[test]
    fn test_deltas_zero_at_first_date() {
        let ds = dataset();
        let agg = Aggregator::new(&ds);

        let deltas = agg.deltas(ds.first_date()).unwrap();
        assert_eq!(deltas, CategoryCounts::default());
    }

    #[test]
    fn test_deltas_can_be_negative() {
        let ds = crate::dataset::dataset_from_csv(
            "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20\n,Italy,43.0,12.0,5,5",
            "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20\n,Italy,43.0,12.0,0,0",
            "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20\n,Italy,43.0,12.0,4,1",
        )
        .unwrap();
        let agg = Aggregator::new(&ds);

        let deltas = agg.deltas(day(23)).unwrap();
        assert_eq!(deltas.recovered, -3);
        assert_eq!(format_delta(deltas.recovered), "-3");
    }

    #[test]
    fn test_cumulative_series() {
        let ds = dataset();
        let agg = Aggregator::new(&ds);

        let series = agg.cumulative_series(day(23)).unwrap();
        assert_eq!(series.confirmed.len(), 2);
        assert_eq!(series.confirmed.last().unwrap().date, day(23));
        assert_eq!(
            series.confirmed.iter().map(|p| p.total).collect::<Vec<_>>(),
            vec![555, 654]
        );

        for (i, date) in ds.dates().iter().enumerate() {
            let series = agg.cumulative_series(*date).unwrap();
            for (_, points) in series.iter() {
                assert_eq!(points.len(), i + 1);
                assert_eq!(points.last().unwrap().date, *date);
            }
        }
    }

    #[test]
    fn test_unknown_date() {
        let ds = dataset();
        let agg = Aggregator::new(&ds);

        assert!(matches!(
            agg.totals(day(1)),
            Err(DatasetError::UnknownDate(_))
        ));
        assert!(agg.deltas(day(1)).is_err());
        assert!(agg.cumulative_series(day(1)).is_err());
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(941), "941");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
        assert_eq!(format_count(-12_345), "-12,345");
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(287), "+287");
        assert_eq!(format_delta(0), "+0");
        assert_eq!(format_delta(-1_500), "-1,500");
    }
}
