//! Style and dashboard configuration snapshots.
//!
//! `StyleConfig` is an immutable snapshot: the `with_*` setters clamp to
//! range and return a new value, so no in-place mutation is ever visible to
//! other readers. `DashboardConfig` is TOML-loadable with per-field defaults
//! so a partial file works.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::chart_spec::PlotType;
use crate::sample::MAX_POINTS;

/// Stroke width bounds (px).
pub const STROKE_WIDTH_MIN: u32 = 1;
pub const STROKE_WIDTH_MAX: u32 = 8;

/// Marker size bounds (px).
pub const MARKER_SIZE_MIN: u32 = 2;
pub const MARKER_SIZE_MAX: u32 = 16;

/// Trace opacity bounds.
pub const OPACITY_MIN: f64 = 0.1;
pub const OPACITY_MAX: f64 = 1.0;

/// Line interpolation shape.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveType {
    #[default]
    Spline,
    Linear,
    Hv,
    Vh,
}

impl CurveType {
    pub const ALL: [Self; 4] = [Self::Spline, Self::Linear, Self::Hv, Self::Vh];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spline => "spline",
            Self::Linear => "linear",
            Self::Hv => "hv",
            Self::Vh => "vh",
        }
    }
}

/// Hover behavior requested from the rendering engine.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HoverMode {
    #[default]
    Closest,
    X,
    Y,
    Off,
}

impl HoverMode {
    pub const ALL: [Self; 4] = [Self::Closest, Self::X, Self::Y, Self::Off];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closest => "closest",
            Self::X => "x",
            Self::Y => "y",
            Self::Off => "off",
        }
    }
}

/// Immutable styling snapshot.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct StyleConfig {
    pub show_grid: bool,
    pub show_legend: bool,
    /// Clamped to `[STROKE_WIDTH_MIN, STROKE_WIDTH_MAX]`.
    pub stroke_width: u32,
    /// Clamped to `[OPACITY_MIN, OPACITY_MAX]`.
    pub opacity: f64,
    /// Transition duration handed to the engine, in milliseconds.
    pub animation_ms: u32,
    pub curve: CurveType,
    /// Clamped to `[MARKER_SIZE_MIN, MARKER_SIZE_MAX]`.
    pub marker_size: u32,
    pub hover_mode: HoverMode,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_legend: true,
            stroke_width: 2,
            opacity: 0.9,
            animation_ms: 500,
            curve: CurveType::Spline,
            marker_size: 6,
            hover_mode: HoverMode::Closest,
        }
    }
}

impl StyleConfig {
    pub fn with_show_grid(mut self, on: bool) -> Self {
        self.show_grid = on;
        self
    }

    pub fn with_show_legend(mut self, on: bool) -> Self {
        self.show_legend = on;
        self
    }

    pub fn with_stroke_width(mut self, width: u32) -> Self {
        self.stroke_width = width.clamp(STROKE_WIDTH_MIN, STROKE_WIDTH_MAX);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(OPACITY_MIN, OPACITY_MAX);
        self
    }

    pub fn with_animation_ms(mut self, ms: u32) -> Self {
        self.animation_ms = ms;
        self
    }

    pub fn with_curve(mut self, curve: CurveType) -> Self {
        self.curve = curve;
        self
    }

    pub fn with_marker_size(mut self, size: u32) -> Self {
        self.marker_size = size.clamp(MARKER_SIZE_MIN, MARKER_SIZE_MAX);
        self
    }

    pub fn with_hover_mode(mut self, mode: HoverMode) -> Self {
        self.hover_mode = mode;
        self
    }
}

/// Dashboard configuration. Every field has a default, so any subset may be
/// given in TOML.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// URL the CSV payload is fetched from.
    pub source_url: String,
    /// Maximum records kept after sampling. 0 = unlimited.
    pub max_points: usize,
    /// Plot type shown on first load.
    pub plot_type: PlotType,
    pub style: StyleConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source_url: String::new(),
            max_points: MAX_POINTS,
            plot_type: PlotType::default(),
            style: StyleConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).wrap_err("parsing dashboard config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("reading config file {}", path.display()))?;
        Self::from_toml(&text)
    }
}
