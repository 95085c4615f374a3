//! Core data types for the dashboard dataset
//!
//! - `Category`: which case count a table tracks
//! - `PerCategory`: one value per category, in display order
//! - `RegionRecord`: one row of a feed
//! - `TimeSeriesTable`: one parsed feed
//! - `Dataset`: the three tables sharing one ordered date axis

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use super::error::{DatasetError, DatasetResult};

/// A tracked case-count series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Confirmed,
    Deaths,
    Recovered,
}

impl Category {
    /// All categories in display order
    pub fn all() -> &'static [Category; 3] {
        &[Category::Confirmed, Category::Deaths, Category::Recovered]
    }

    /// Name used in the feed file names (`time_series_19-covid-{name}.csv`)
    pub fn feed_name(&self) -> &'static str {
        match self {
            Category::Confirmed => "Confirmed",
            Category::Deaths => "Deaths",
            Category::Recovered => "Recovered",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.feed_name())
    }
}

/// One value per category
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerCategory<T> {
    pub confirmed: T,
    pub deaths: T,
    pub recovered: T,
}

impl<T> PerCategory<T> {
    /// Build by evaluating `f` once per category
    pub fn from_fn(mut f: impl FnMut(Category) -> T) -> Self {
        Self {
            confirmed: f(Category::Confirmed),
            deaths: f(Category::Deaths),
            recovered: f(Category::Recovered),
        }
    }

    pub fn get(&self, category: Category) -> &T {
        match category {
            Category::Confirmed => &self.confirmed,
            Category::Deaths => &self.deaths,
            Category::Recovered => &self.recovered,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Category, &T) -> U) -> PerCategory<U> {
        PerCategory {
            confirmed: f(Category::Confirmed, &self.confirmed),
            deaths: f(Category::Deaths, &self.deaths),
            recovered: f(Category::Recovered, &self.recovered),
        }
    }

    /// Iterate in display order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::all().iter().map(move |c| (*c, self.get(*c)))
    }
}

impl<T, E> PerCategory<Result<T, E>> {
    /// Turn a set of results into a result of a set, failing on the first error
    pub fn transpose(self) -> Result<PerCategory<T>, E> {
        Ok(PerCategory {
            confirmed: self.confirmed?,
            deaths: self.deaths?,
            recovered: self.recovered?,
        })
    }
}

/// One geographic entity with a fixed location and one count per date
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRecord {
    /// Province or state, absent for country-level rows
    pub province: Option<String>,
    pub country: String,
    pub lat: f64,
    pub long: f64,
    /// One count per date, aligned with the table's date axis
    pub counts: Vec<i64>,
}

impl RegionRecord {
    pub fn new(
        province: Option<String>,
        country: impl Into<String>,
        lat: f64,
        long: f64,
        counts: Vec<i64>,
    ) -> Self {
        Self {
            province,
            country: country.into(),
            lat,
            long,
            counts,
        }
    }

    /// "Province, Country" or just "Country"
    pub fn label(&self) -> String {
        match &self.province {
            Some(p) => format!("{}, {}", p, self.country),
            None => self.country.clone(),
        }
    }

    /// Count at a date column
    pub fn count_at(&self, index: usize) -> i64 {
        self.counts.get(index).copied().unwrap_or(0)
    }
}

/// One parsed feed
#[derive(Debug, Clone)]
pub struct TimeSeriesTable {
    pub category: Category,
    pub dates: Vec<NaiveDate>,
    pub regions: Vec<RegionRecord>,
}

impl TimeSeriesTable {
    pub fn new(category: Category, dates: Vec<NaiveDate>, regions: Vec<RegionRecord>) -> Self {
        Self {
            category,
            dates,
            regions,
        }
    }

    /// Sum of one date column across all regions
    pub fn column_sum(&self, index: usize) -> i64 {
        self.regions.iter().map(|r| r.count_at(index)).sum()
    }
}

/// The three tables, immutable after construction
///
/// Shared read-only behind an `Arc` by every consumer; no write path exists.
#[derive(Debug)]
pub struct Dataset {
    dates: Arc<[NaiveDate]>,
    index: HashMap<NaiveDate, usize>,
    tables: PerCategory<TimeSeriesTable>,
}

impl Dataset {
    /// Bundle three tables, checking they share one ordered date axis
    pub fn new(
        confirmed: TimeSeriesTable,
        deaths: TimeSeriesTable,
        recovered: TimeSeriesTable,
    ) -> DatasetResult<Self> {
        if confirmed.dates.is_empty() {
            return Err(DatasetError::Empty);
        }
        for table in [&deaths, &recovered] {
            if table.dates != confirmed.dates {
                return Err(DatasetError::DateMismatch {
                    category: table.category,
                });
            }
        }

        let dates: Arc<[NaiveDate]> = confirmed.dates.clone().into();
        let mut index = HashMap::with_capacity(dates.len());
        for (i, date) in dates.iter().enumerate() {
            if index.insert(*date, i).is_some() {
                return Err(DatasetError::DuplicateDate(*date));
            }
        }

        Ok(Self {
            dates,
            index,
            tables: PerCategory {
                confirmed,
                deaths,
                recovered,
            },
        })
    }

    /// Ordered date axis shared by all tables
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Cheap handle on the date axis, for the cursor
    pub fn shared_dates(&self) -> Arc<[NaiveDate]> {
        Arc::clone(&self.dates)
    }

    pub fn first_date(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// Column index of a date
    pub fn index_of(&self, date: NaiveDate) -> DatasetResult<usize> {
        self.index
            .get(&date)
            .copied()
            .ok_or(DatasetError::UnknownDate(date))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.index.contains_key(&date)
    }

    pub fn table(&self, category: Category) -> &TimeSeriesTable {
        self.tables.get(category)
    }

    /// Number of regions in the confirmed feed
    pub fn region_count(&self) -> usize {
        self.tables.confirmed.regions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, d).unwrap()
    }

    fn table(category: Category, dates: Vec<NaiveDate>) -> TimeSeriesTable {
        let counts = vec![1; dates.len()];
        TimeSeriesTable::new(
            category,
            dates,
            vec![RegionRecord::new(None, "Italy", 43.0, 12.0, counts)],
        )
    }

    #[test]
    fn test_region_label() {
        let with_province =
            RegionRecord::new(Some("Hubei".to_string()), "China", 30.97, 112.27, vec![]);
        assert_eq!(with_province.label(), "Hubei, China");

        let country = RegionRecord::new(None, "Italy", 43.0, 12.0, vec![]);
        assert_eq!(country.label(), "Italy");
    }

    #[test]
    fn test_dataset_index() {
        let dates = vec![day(22), day(23), day(24)];
        let ds = Dataset::new(
            table(Category::Confirmed, dates.clone()),
            table(Category::Deaths, dates.clone()),
            table(Category::Recovered, dates),
        )
        .unwrap();

        assert_eq!(ds.first_date(), day(22));
        assert_eq!(ds.last_date(), day(24));
        assert_eq!(ds.index_of(day(23)).unwrap(), 1);
        assert!(matches!(
            ds.index_of(day(25)),
            Err(DatasetError::UnknownDate(_))
        ));
    }

    #[test]
    fn test_dataset_rejects_mismatched_dates() {
        let result = Dataset::new(
            table(Category::Confirmed, vec![day(22), day(23)]),
            table(Category::Deaths, vec![day(22), day(23)]),
            table(Category::Recovered, vec![day(22), day(24)]),
        );
        assert!(matches!(
            result,
            Err(DatasetError::DateMismatch {
                category: Category::Recovered
            })
        ));
    }

    #[test]
    fn test_dataset_rejects_duplicate_dates() {
        let dates = vec![day(22), day(23), day(22)];
        let result = Dataset::new(
            table(Category::Confirmed, dates.clone()),
            table(Category::Deaths, dates.clone()),
            table(Category::Recovered, dates),
        );
        assert!(matches!(result, Err(DatasetError::DuplicateDate(d)) if d == day(22)));
    }

    #[test]
    fn test_dataset_rejects_empty() {
        let result = Dataset::new(
            table(Category::Confirmed, vec![]),
            table(Category::Deaths, vec![]),
            table(Category::Recovered, vec![]),
        );
        assert!(matches!(result, Err(DatasetError::Empty)));
    }

    #[test]
    fn test_per_category_iter_order() {
        let counts = PerCategory {
            confirmed: 3,
            deaths: 1,
            recovered: 2,
        };
        let order: Vec<_> = counts.iter().map(|(c, v)| (c, *v)).collect();
        assert_eq!(
            order,
            vec![
                (Category::Confirmed, 3),
                (Category::Deaths, 1),
                (Category::Recovered, 2)
            ]
        );
    }
}
