//! The famous curve
//!
//! Cumulative totals per category up to the selected date: confirmed and
//! deaths as lines, recovered as overlaid bars, all on one date axis.

use chrono::NaiveDate;
use serde::Serialize;

use super::style::{ChartStyle, Margin};
use crate::aggregate::Aggregator;
use crate::dataset::{Category, Dataset, DatasetResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    LinesMarkers,
    Bar,
}

impl TraceKind {
    fn for_category(category: Category) -> Self {
        match category {
            Category::Confirmed | Category::Deaths => TraceKind::LinesMarkers,
            Category::Recovered => TraceKind::Bar,
        }
    }
}

/// One category's series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveTrace {
    pub name: Category,
    pub kind: TraceKind,
    pub color: String,
    pub x: Vec<NaiveDate>,
    pub y: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    Overlay,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveAxis {
    pub title: String,
    pub color: String,
    pub show_grid: bool,
    pub zero_line: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveLegend {
    pub x: f64,
    pub font_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveLayout {
    pub margin: Margin,
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    pub bar_mode: BarMode,
    pub x_axis: CurveAxis,
    pub y_axis: CurveAxis,
    pub legend: CurveLegend,
}

/// Complete curve figure for one date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveSpec {
    pub date: NaiveDate,
    pub traces: Vec<CurveTrace>,
    pub layout: CurveLayout,
}

pub(crate) fn build_curve(
    dataset: &Dataset,
    style: &ChartStyle,
    date: NaiveDate,
) -> DatasetResult<CurveSpec> {
    let series = Aggregator::new(dataset).cumulative_series(date)?;

    let traces = series
        .iter()
        .map(|(category, points)| CurveTrace {
            name: category,
            kind: TraceKind::for_category(category),
            color: style.colors.get(category).to_string(),
            x: points.iter().map(|p| p.date).collect(),
            y: points.iter().map(|p| p.total).collect(),
        })
        .collect();

    let axis = |title: &str, show_grid: bool| CurveAxis {
        title: title.to_string(),
        color: style.axis.color.clone(),
        show_grid,
        zero_line: style.axis.zero_line,
    };

    Ok(CurveSpec {
        date,
        traces,
        layout: CurveLayout {
            margin: style.margin,
            paper_bgcolor: style.background.clone(),
            plot_bgcolor: style.background.clone(),
            bar_mode: BarMode::Overlay,
            // the x axis keeps the renderer's default grid
            x_axis: axis("Date", true),
            y_axis: axis("Number of Cases", style.axis.show_grid),
            legend: CurveLegend {
                x: style.legend.x,
                font_color: style.font_color.clone(),
            },
        },
    })
}
