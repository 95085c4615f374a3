//! Chart Builders
//!
//! Pure functions from (dataset, style, date) to renderer-ready figure
//! specifications:
//!
//! - **map**: bubble map of confirmed cases per region
//! - **curve**: cumulative totals per category up to the date
//! - **style**: typed theme shared by both
//!
//! Builders only read the dataset, so a shared `Arc<Dataset>` can serve any
//! number of concurrent builds.

pub mod curve;
pub mod map;
pub mod style;

pub use curve::{BarMode, CurveAxis, CurveLayout, CurveLegend, CurveSpec, CurveTrace, TraceKind};
pub use map::{marker_size, MapLayout, MapMarker, MapSpec, SizeMode, MARKER_SIZE_DIVISOR};
pub use style::{
    AxisStyle, CategoryColors, ChartStyle, Easing, GeoStyle, HoverLabelStyle, LegendStyle, Margin,
    Projection, Transition,
};

use chrono::NaiveDate;

use crate::dataset::{Dataset, DatasetResult};

/// Builds both figures against one dataset and theme
#[derive(Debug, Clone, Copy)]
pub struct ChartBuilder<'a> {
    dataset: &'a Dataset,
    style: &'a ChartStyle,
}

impl<'a> ChartBuilder<'a> {
    pub fn new(dataset: &'a Dataset, style: &'a ChartStyle) -> Self {
        Self { dataset, style }
    }

    pub fn build_map(&self, date: NaiveDate) -> DatasetResult<MapSpec> {
        map::build_map(self.dataset, self.style, date)
    }

    pub fn build_curve(&self, date: NaiveDate) -> DatasetResult<CurveSpec> {
        curve::build_curve(self.dataset, self.style, date)
    }
}
