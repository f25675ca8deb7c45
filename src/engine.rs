//! Rendering engine contract.
//!
//! The dashboard owns no pixels: it hands descriptors to an external engine
//! through this narrow trait and consumes the engine's interaction events.

use thiserror::Error;

use crate::chart_spec::ChartDescriptor;
use crate::config::HoverMode;

/// Opaque identifier for a chart the engine currently owns.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ChartHandle(pub u64);

/// Engine-side failure. Never mapped to the `Error` view phase; callers log
/// and move on.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct EngineError(pub String);

/// Draw options resolved from the style snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    pub animation_ms: u32,
    pub hover_mode: HoverMode,
}

/// Relayout request: explicit axis ranges, or an autorange reset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutPatch {
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
    pub autorange: bool,
}

impl LayoutPatch {
    /// Restore auto-ranging on both axes.
    pub fn autorange() -> Self {
        Self {
            autorange: true,
            ..Self::default()
        }
    }
}

/// Interaction event emitted by the engine. An explicit range means the user
/// zoomed or panned the visible window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RelayoutEvent {
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
}

impl RelayoutEvent {
    pub fn has_explicit_range(&self) -> bool {
        self.x_range.is_some() || self.y_range.is_some()
    }
}

/// Raster formats the capture contract supports.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ImageFormat {
    Png,
}

/// Snapshot request: width/height in CSS pixels, `scale` multiplies density.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureRequest {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub scale: f64,
}

/// The surface the external rendering engine exposes to the dashboard.
pub trait RenderEngine {
    /// Draws a fresh chart, fully superseding whatever the engine showed
    /// before.
    fn draw(
        &mut self,
        descriptor: &ChartDescriptor,
        options: &RenderOptions,
    ) -> Result<ChartHandle, EngineError>;

    /// Applies a layout patch to a live chart.
    fn relayout(&mut self, handle: ChartHandle, patch: &LayoutPatch) -> Result<(), EngineError>;

    /// Encodes a live chart to raster bytes.
    fn capture_image(
        &mut self,
        handle: ChartHandle,
        request: &CaptureRequest,
    ) -> Result<Vec<u8>, EngineError>;
}
