//! Dashboard view model
//!
//! Everything the page shows for one date, computed in one go.

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::{format_count, format_delta, Aggregator, CategoryCounts};
use crate::charts::{ChartBuilder, ChartStyle, CurveSpec, MapSpec};
use crate::dataset::{Category, Dataset, DatasetResult};

/// Bootstrap contextual color of a KPI card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardColor {
    Warning,
    Danger,
    Success,
}

impl From<Category> for CardColor {
    fn from(category: Category) -> Self {
        match category {
            Category::Confirmed => CardColor::Warning,
            Category::Deaths => CardColor::Danger,
            Category::Recovered => CardColor::Success,
        }
    }
}

/// Total and daily change for one category, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiCard {
    pub category: Category,
    pub color: CardColor,
    /// `1,234,567`
    pub total: String,
    /// `+1,234` / `-12` / `+0`
    pub change: String,
}

/// Totals, deltas, map and curve for one date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub date: NaiveDate,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub has_previous: bool,
    pub has_next: bool,
    pub totals: CategoryCounts,
    pub deltas: CategoryCounts,
    pub cards: Vec<KpiCard>,
    pub map: MapSpec,
    pub curve: CurveSpec,
}

impl DashboardView {
    /// Compute all four outputs for a date
    pub fn compute(dataset: &Dataset, style: &ChartStyle, date: NaiveDate) -> DatasetResult<Self> {
        let aggregator = Aggregator::new(dataset);
        let charts = ChartBuilder::new(dataset, style);

        let totals = aggregator.totals(date)?;
        let deltas = aggregator.deltas(date)?;
        let map = charts.build_map(date)?;
        let curve = charts.build_curve(date)?;

        let cards = Category::all()
            .iter()
            .map(|c| KpiCard {
                category: *c,
                color: CardColor::from(*c),
                total: format_count(*totals.get(*c)),
                change: format_delta(*deltas.get(*c)),
            })
            .collect();

        let first_date = dataset.first_date();
        let last_date = dataset.last_date();

        Ok(Self {
            date,
            first_date,
            last_date,
            has_previous: date != first_date,
            has_next: date != last_date,
            totals,
            deltas,
            cards,
            map,
            curve,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::{dataset, day};

    #[test]
    fn test_compute_view() {
        let ds = dataset();
        let view = DashboardView::compute(&ds, &ChartStyle::default(), day(24)).unwrap();

        assert_eq!(view.date, day(24));
        assert_eq!(view.totals.confirmed, 941);
        assert_eq!(view.deltas.confirmed, 287);
        assert!(view.has_previous);
        assert!(!view.has_next);
        assert_eq!(view.map.date, day(24));
        assert_eq!(view.curve.date, day(24));
    }

    #[test]
    fn test_cards() {
        let ds = dataset();
        let view = DashboardView::compute(&ds, &ChartStyle::default(), day(24)).unwrap();

        assert_eq!(
            view.cards[0],
            KpiCard {
                category: Category::Confirmed,
                color: CardColor::Warning,
                total: "941".to_string(),
                change: "+287".to_string(),
            }
        );
        assert_eq!(view.cards[1].color, CardColor::Danger);
        assert_eq!(view.cards[1].change, "+8");
        assert_eq!(view.cards[2].color, CardColor::Success);
        assert_eq!(view.cards[2].change, "+5");
    }

    #[test]
    fn test_first_day_changes_are_zero() {
        let ds = dataset();
        let view = DashboardView::compute(&ds, &ChartStyle::default(), day(22)).unwrap();

        assert!(!view.has_previous);
        assert!(view.cards.iter().all(|c| c.change == "+0"));
    }

    #[test]
    fn test_unknown_date_fails() {
        let ds = dataset();
        assert!(DashboardView::compute(&ds, &ChartStyle::default(), day(3)).is_err());
    }
}
