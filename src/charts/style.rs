//! Chart styling
//!
//! Typed theme for both figures. Defaults reproduce the dark "superhero"
//! look of the dashboard; every field can be overridden from the `[chart]`
//! section of the config file.

use serde::{Deserialize, Serialize};

use crate::dataset::Category;

/// Full theme shared by the map and the curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartStyle {
    pub colors: CategoryColors,
    /// Paper and plot background
    pub background: String,
    pub font_color: String,
    pub margin: Margin,
    pub geo: GeoStyle,
    pub transition: Transition,
    pub axis: AxisStyle,
    pub legend: LegendStyle,
    pub hover: HoverLabelStyle,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            colors: CategoryColors::default(),
            background: "#4E5D6C".to_string(),
            font_color: "#fff".to_string(),
            margin: Margin::default(),
            geo: GeoStyle::default(),
            transition: Transition::default(),
            axis: AxisStyle::default(),
            legend: LegendStyle::default(),
            hover: HoverLabelStyle::default(),
        }
    }
}

/// One trace color per category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryColors {
    pub confirmed: String,
    pub deaths: String,
    pub recovered: String,
}

impl CategoryColors {
    pub fn get(&self, category: Category) -> &str {
        match category {
            Category::Confirmed => &self.confirmed,
            Category::Deaths => &self.deaths,
            Category::Recovered => &self.recovered,
        }
    }
}

impl Default for CategoryColors {
    fn default() -> Self {
        Self {
            confirmed: "#f0ad4e".to_string(),
            deaths: "#d9534f".to_string(),
            recovered: "#5cb85c".to_string(),
        }
    }
}

/// Figure margins in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

/// Map projection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projection {
    #[default]
    #[serde(rename = "natural earth")]
    NaturalEarth,
    #[serde(rename = "equirectangular")]
    Equirectangular,
    #[serde(rename = "mercator")]
    Mercator,
    #[serde(rename = "orthographic")]
    Orthographic,
    #[serde(rename = "robinson")]
    Robinson,
}

/// Geographic base map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeoStyle {
    pub projection: Projection,
    pub land_color: String,
    pub show_ocean: bool,
    pub ocean_color: String,
    pub show_countries: bool,
    pub country_color: String,
    pub coastline_color: String,
    pub show_lakes: bool,
    pub show_rivers: bool,
    pub show_frame: bool,
    pub frame_width: u32,
    pub bg_color: String,
}

impl Default for GeoStyle {
    fn default() -> Self {
        Self {
            projection: Projection::NaturalEarth,
            land_color: "#4E5D6C".to_string(),
            show_ocean: true,
            ocean_color: "#4E5D6C".to_string(),
            show_countries: true,
            country_color: "#868e96".to_string(),
            coastline_color: "#868e96".to_string(),
            show_lakes: false,
            show_rivers: false,
            show_frame: false,
            frame_width: 0,
            bg_color: "#4E5D6C".to_string(),
        }
    }
}

/// Easing curve for redraw animations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    CubicIn,
    CubicOut,
    #[default]
    CubicInOut,
}

/// Animation applied when a figure is redrawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Transition {
    pub duration_ms: u32,
    pub easing: Easing,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            duration_ms: 500,
            easing: Easing::CubicInOut,
        }
    }
}

/// Curve axes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AxisStyle {
    pub color: String,
    pub show_grid: bool,
    pub zero_line: bool,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            color: "#fff".to_string(),
            show_grid: false,
            zero_line: false,
        }
    }
}

/// Curve legend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LegendStyle {
    /// Horizontal anchor, 0.0 (left) to 1.0 (right)
    pub x: f64,
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self { x: 0.7 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HoverLabelStyle {
    pub bg_color: String,
    pub border_color: String,
    pub font_color: String,
}

impl Default for HoverLabelStyle {
    fn default() -> Self {
        Self {
            bg_color: "#5bc0de".to_string(),
            border_color: "#5bc0de".to_string(),
            font_color: "white".to_string(),
        }
    }
}
