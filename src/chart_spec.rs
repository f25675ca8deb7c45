//! Chart descriptor types handed to the rendering engine.
//!
//! Series and layout are enums per chart family, so a pie/radar/geograph
//! descriptor structurally cannot carry cartesian axis fields.

use serde::{Deserialize, Serialize};

use crate::config::CurveType;

/// Visualization mode.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotType {
    #[default]
    Line,
    Bar,
    Area,
    Scatter,
    Pie,
    Radar,
    GeoGraph,
}

impl PlotType {
    pub const ALL: [Self; 7] = [
        Self::Line,
        Self::Bar,
        Self::Area,
        Self::Scatter,
        Self::Pie,
        Self::Radar,
        Self::GeoGraph,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Area => "area",
            Self::Scatter => "scatter",
            Self::Pie => "pie",
            Self::Radar => "radar",
            Self::GeoGraph => "geograph",
        }
    }

    /// Line, bar, area, and scatter share the x/y pair pipeline.
    pub fn is_cartesian(self) -> bool {
        matches!(self, Self::Line | Self::Bar | Self::Area | Self::Scatter)
    }
}

/// One x/y trace with styling resolved from the style snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct XySeries {
    /// Legend label (the selected y column).
    pub name: String,
    pub points: Vec<(f64, f64)>,
    pub stroke_width: u32,
    pub opacity: f64,
    pub marker_size: u32,
    pub curve: CurveType,
}

/// Pie slices: parallel label/value lists in first-encountered group order.
#[derive(Clone, Debug, PartialEq)]
pub struct PieSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub opacity: f64,
}

/// Radar outline: one category and value per spoke.
#[derive(Clone, Debug, PartialEq)]
pub struct RadarSeries {
    pub name: String,
    pub categories: Vec<String>,
    pub values: Vec<f64>,
    pub stroke_width: u32,
    pub opacity: f64,
}

/// Geographic scatter: parallel latitude/longitude lists.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoSeries {
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
    pub marker_size: u32,
    pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SeriesSpec {
    Xy(XySeries),
    Pie(PieSeries),
    Radar(RadarSeries),
    Geo(GeoSeries),
}

/// Finite data extent of a cartesian descriptor. The engine autoranges and
/// may ignore it; the export fallback renderer requires it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DataBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Axis titles, grid, and data extent for the cartesian chart family.
#[derive(Clone, Debug, PartialEq)]
pub struct CartesianLayout {
    /// The selected x column (or the index pseudo-column).
    pub x_title: String,
    /// The selected y column.
    pub y_title: String,
    pub show_grid: bool,
    pub show_legend: bool,
    /// `None` when every pair was filtered out.
    pub bounds: Option<DataBounds>,
}

/// Legend-only layout for pie charts; there is no axis frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PieLayout {
    pub show_legend: bool,
}

/// Polar frame for radar charts.
#[derive(Clone, Debug, PartialEq)]
pub struct RadarLayout {
    pub show_grid: bool,
    pub show_legend: bool,
}

/// Default basemap style for geographic charts.
pub const DEFAULT_MAP_STYLE: &str = "open-street-map";

/// Map viewport computed from the plotted points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoView {
    pub center_lat: f64,
    pub center_lon: f64,
    /// Discrete zoom level; larger means closer.
    pub zoom: u8,
}

/// Map layout replacing any cartesian axis configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoLayout {
    /// `None` when no record carries a finite lat/lon pair — geography is
    /// unavailable for this dataset.
    pub view: Option<GeoView>,
    pub map_style: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LayoutSpec {
    Cartesian(CartesianLayout),
    Pie(PieLayout),
    Radar(RadarLayout),
    Geo(GeoLayout),
}

/// The complete, type-specific specification handed to the rendering engine.
/// Recomputed wholesale on every dependency change; never patched.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartDescriptor {
    pub plot_type: PlotType,
    pub series: Vec<SeriesSpec>,
    pub layout: LayoutSpec,
}

impl ChartDescriptor {
    pub fn cartesian_layout(&self) -> Option<&CartesianLayout> {
        match &self.layout {
            LayoutSpec::Cartesian(layout) => Some(layout),
            _ => None,
        }
    }

    pub fn xy_series(&self) -> impl Iterator<Item = &XySeries> {
        self.series.iter().filter_map(|s| match s {
            SeriesSpec::Xy(xy) => Some(xy),
            _ => None,
        })
    }
}
