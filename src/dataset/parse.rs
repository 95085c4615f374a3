//! Feed parsing
//!
//! Turns one CSV feed into a `TimeSeriesTable`. The first four columns are
//! descriptive (`Province/State, Country/Region, Lat, Long`); every column
//! after that is one date.

use chrono::NaiveDate;

use super::date::canonical_date;
use super::error::{DatasetError, DatasetResult};
use super::types::{Category, RegionRecord, TimeSeriesTable};

/// Number of leading descriptive columns
pub const DESCRIPTIVE_COLUMNS: usize = 4;

const COLUMN_NAMES: [&str; DESCRIPTIVE_COLUMNS] =
    ["Province/State", "Country/Region", "Lat", "Long"];

/// Parse one feed
pub fn parse_table(category: Category, csv_data: &str) -> DatasetResult<TimeSeriesTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.len() < DESCRIPTIVE_COLUMNS {
        return Err(DatasetError::MissingColumn {
            category,
            column: COLUMN_NAMES[headers.len()],
        });
    }

    let labels: Vec<String> = headers
        .iter()
        .skip(DESCRIPTIVE_COLUMNS)
        .map(|h| h.trim().to_string())
        .collect();
    let dates = labels
        .iter()
        .map(|l| canonical_date(l))
        .collect::<DatasetResult<Vec<NaiveDate>>>()?;

    let expected = headers.len();
    let mut regions = Vec::new();

    for (row_num, result) in reader.records().enumerate() {
        // header is line 1
        let line = row_num + 2;
        let record = result?;

        if record.len() < expected {
            return Err(DatasetError::MalformedRow {
                category,
                line,
                expected,
                found: record.len(),
            });
        }

        let province = record
            .get(0)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let country = record.get(1).unwrap_or_default().trim().to_string();
        let lat = parse_coordinate(category, line, record.get(2).unwrap_or_default())?;
        let long = parse_coordinate(category, line, record.get(3).unwrap_or_default())?;

        let counts = record
            .iter()
            .skip(DESCRIPTIVE_COLUMNS)
            .take(dates.len())
            .zip(&labels)
            .map(|(cell, label)| parse_count(category, line, label, cell))
            .collect::<DatasetResult<Vec<i64>>>()?;

        regions.push(RegionRecord::new(province, country, lat, long, counts));
    }

    tracing::debug!(
        category = %category,
        regions = regions.len(),
        dates = dates.len(),
        "Parsed feed"
    );

    Ok(TimeSeriesTable::new(category, dates, regions))
}

fn parse_coordinate(category: Category, line: usize, cell: &str) -> DatasetResult<f64> {
    cell.trim()
        .parse::<f64>()
        .map_err(|_| DatasetError::InvalidCoordinate {
            category,
            line,
            value: cell.to_string(),
        })
}

/// Empty cells count as zero
fn parse_count(category: Category, line: usize, label: &str, cell: &str) -> DatasetResult<i64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(0);
    }
    cell.parse::<i64>().map_err(|_| DatasetError::InvalidCount {
        category,
        line,
        column: label.to_string(),
        value: cell.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::date::format_date;

    const CONFIRMED: &str = "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20
Hubei,China,30.9756,112.2707,444,444,549
,Thailand,15.0,101.0,2,3,5
Washington,US,47.4009,-121.4905,1,,1";

    #[test]
    fn test_parse_table() {
        let table = parse_table(Category::Confirmed, CONFIRMED).unwrap();

        assert_eq!(table.category, Category::Confirmed);
        let labels: Vec<_> = table.dates.iter().map(|d| format_date(*d)).collect();
        assert_eq!(labels, vec!["2020-01-22", "2020-01-23", "2020-01-24"]);
        assert_eq!(table.regions.len(), 3);

        let hubei = &table.regions[0];
        assert_eq!(hubei.province.as_deref(), Some("Hubei"));
        assert_eq!(hubei.country, "China");
        assert_eq!(hubei.counts, vec![444, 444, 549]);

        let thailand = &table.regions[1];
        assert!(thailand.province.is_none());
        assert!((thailand.lat - 15.0).abs() < f64::EPSILON);

        // empty cell counts as zero
        assert_eq!(table.regions[2].counts, vec![1, 0, 1]);
    }

    #[test]
    fn test_parse_table_column_sums() {
        let table = parse_table(Category::Confirmed, CONFIRMED).unwrap();
        assert_eq!(table.column_sum(0), 447);
        assert_eq!(table.column_sum(1), 447);
        assert_eq!(table.column_sum(2), 555);
    }

    #[test]
    fn test_parse_table_invalid_count() {
        let csv_data = "Province/State,Country/Region,Lat,Long,1/22/20
,Italy,43.0,12.0,many";
        let err = parse_table(Category::Deaths, csv_data).unwrap_err();
        match err {
            DatasetError::InvalidCount {
                category,
                line,
                column,
                value,
            } => {
                assert_eq!(category, Category::Deaths);
                assert_eq!(line, 2);
                assert_eq!(column, "1/22/20");
                assert_eq!(value, "many");
            }
            other => panic!("Expected InvalidCount, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_table_short_row() {
        let csv_data = "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20
,Italy,43.0,12.0,1";
        let err = parse_table(Category::Confirmed, csv_data).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MalformedRow {
                expected: 6,
                found: 5,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_table_bad_date_header() {
        let csv_data = "Province/State,Country/Region,Lat,Long,yesterday
,Italy,43.0,12.0,1";
        assert!(matches!(
            parse_table(Category::Confirmed, csv_data),
            Err(DatasetError::InvalidDateLabel(_))
        ));
    }

    #[test]
    fn test_parse_table_missing_columns() {
        let csv_data = "Province/State,Country/Region\nHubei,China";
        assert!(matches!(
            parse_table(Category::Recovered, csv_data),
            Err(DatasetError::MissingColumn { column: "Lat", .. })
        ));
    }

    #[test]
    fn test_parse_table_bad_coordinate() {
        let csv_data = "Province/State,Country/Region,Lat,Long,1/22/20
,Italy,north,12.0,1";
        assert!(matches!(
            parse_table(Category::Confirmed, csv_data),
            Err(DatasetError::InvalidCoordinate { line: 2, .. })
        ));
    }
}
