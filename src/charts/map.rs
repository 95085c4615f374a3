//! Infection map
//!
//! Bubble map of confirmed cases: one marker per region with a non-zero
//! confirmed count at the selected date. Marker area, not radius, tracks
//! the count.

use chrono::NaiveDate;
use serde::Serialize;

use super::style::{ChartStyle, GeoStyle, HoverLabelStyle, Margin, Transition};
use crate::dataset::{Category, Dataset, DatasetResult};

/// Count-to-size divisor for map markers
pub const MARKER_SIZE_DIVISOR: f64 = 50.0;

/// How marker size is interpreted by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeMode {
    Area,
}

/// One region's bubble
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub label: String,
    pub lat: f64,
    pub lon: f64,
    pub count: i64,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayout {
    pub margin: Margin,
    pub geo: GeoStyle,
    pub paper_bgcolor: String,
    pub transition: Transition,
    pub hoverlabel: HoverLabelStyle,
}

/// Complete bubble-map figure for one date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSpec {
    pub date: NaiveDate,
    pub markers: Vec<MapMarker>,
    pub marker_color: String,
    pub size_mode: SizeMode,
    pub layout: MapLayout,
}

pub(crate) fn build_map(
    dataset: &Dataset,
    style: &ChartStyle,
    date: NaiveDate,
) -> DatasetResult<MapSpec> {
    let index = dataset.index_of(date)?;

    let markers = dataset
        .table(Category::Confirmed)
        .regions
        .iter()
        .filter_map(|region| {
            let count = region.count_at(index);
            (count != 0).then(|| MapMarker {
                label: region.label(),
                lat: region.lat,
                lon: region.long,
                count,
                size: marker_size(count),
            })
        })
        .collect();

    Ok(MapSpec {
        date,
        markers,
        marker_color: style.colors.get(Category::Confirmed).to_string(),
        size_mode: SizeMode::Area,
        layout: MapLayout {
            margin: style.margin,
            geo: style.geo.clone(),
            paper_bgcolor: style.background.clone(),
            transition: style.transition,
            hoverlabel: style.hover.clone(),
        },
    })
}

/// `|count / 50|`
pub fn marker_size(count: i64) -> f64 {
    (count as f64 / MARKER_SIZE_DIVISOR).abs()
}
