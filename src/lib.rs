//! Data pipeline and chart-descriptor synthesis for CSV dashboards.
//!
//! Raw CSV text flows through ingestion, sampling, and schema inference; on
//! every relevant state change a fresh chart descriptor is synthesized and
//! handed to an external rendering engine behind [`engine::RenderEngine`].
//! [`Dashboard`] owns that flow plus the interactive view state: display
//! phase, zoom tracking, and the settings/fullscreen flags.

use std::path::{Path, PathBuf};

pub mod chart_data;
pub mod chart_spec;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod export;
pub mod fetch;
pub mod sample;
pub mod schema;

pub use chart_data::build_descriptor;
pub use chart_spec::{ChartDescriptor, PlotType};
pub use config::{DashboardConfig, StyleConfig};
pub use dataset::{parse_csv, Dataset, Value};
pub use engine::{ChartHandle, LayoutPatch, RelayoutEvent, RenderEngine, RenderOptions};
pub use error::Error;
pub use fetch::{CsvSource, HttpSource};
pub use sample::{sample, MAX_POINTS};
pub use schema::{AxisSelection, ColumnSchema, INDEX_COLUMN};

/// Display phase of the dashboard.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ViewPhase {
    #[default]
    Loading,
    Error,
    Empty,
    NoNumericData,
    Ready,
}

/// Interactive view state alongside the data pipeline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    pub phase: ViewPhase,
    pub is_fullscreen: bool,
    pub show_settings_panel: bool,
    pub is_zoomed_in: bool,
    pub error_message: Option<String>,
}

/// Phase after a fetch+parse attempt succeeded (the pure transition rule;
/// transport and parse failures map to [`ViewPhase::Error`] before this
/// runs). Geograph charts render from geo columns alone, so the missing
/// numeric classification does not block them.
pub fn phase_after_load(
    dataset: &Dataset,
    schema: &ColumnSchema,
    plot_type: PlotType,
) -> ViewPhase {
    if dataset.is_empty() {
        ViewPhase::Empty
    } else if schema.numeric.is_empty() && plot_type != PlotType::GeoGraph {
        ViewPhase::NoNumericData
    } else {
        ViewPhase::Ready
    }
}

/// The view-state controller: owns the dataset/axis/style snapshots, decides
/// when synthesis re-runs, and tracks the interactive flags.
pub struct Dashboard<E: RenderEngine> {
    source: Box<dyn CsvSource>,
    engine: E,
    max_points: usize,
    plot_type: PlotType,
    style: StyleConfig,
    axes: AxisSelection,
    dataset: Dataset,
    schema: ColumnSchema,
    view: ViewState,
    chart: Option<ChartHandle>,
    descriptor: Option<ChartDescriptor>,
}

impl<E: RenderEngine> Dashboard<E> {
    /// Dashboard fetching from `config.source_url` over HTTP.
    pub fn new(engine: E, config: DashboardConfig) -> Self {
        let source = Box::new(HttpSource::new(config.source_url.clone()));
        Self::with_source(engine, source, config)
    }

    pub fn with_source(engine: E, source: Box<dyn CsvSource>, config: DashboardConfig) -> Self {
        Self {
            source,
            engine,
            max_points: config.max_points,
            plot_type: config.plot_type,
            style: config.style,
            axes: AxisSelection::default(),
            dataset: Dataset::default(),
            schema: ColumnSchema::default(),
            view: ViewState::default(),
            chart: None,
            descriptor: None,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn plot_type(&self) -> PlotType {
        self.plot_type
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn axes(&self) -> &AxisSelection {
        &self.axes
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// The descriptor currently live at the engine, when one is.
    pub fn descriptor(&self) -> Option<&ChartDescriptor> {
        self.descriptor.as_ref()
    }

    pub fn chart_handle(&self) -> Option<ChartHandle> {
        self.chart
    }

    /// Fetches, parses, samples, classifies, and redraws. The transport call
    /// blocks, so a refresh fully settles before any other action can run —
    /// overlapping refreshes cannot exist.
    pub fn refresh(&mut self) {
        self.view.phase = ViewPhase::Loading;
        self.view.error_message = None;
        if let Err(err) = self.reload() {
            log::debug!("refresh failed: {err}");
            self.view.phase = ViewPhase::Error;
            self.view.error_message = Some(err.to_string());
            self.descriptor = None;
        }
    }

    fn reload(&mut self) -> Result<(), Error> {
        let text = self.source.fetch()?;
        let dataset = sample(parse_csv(&text)?, self.max_points);
        let schema = ColumnSchema::infer(&dataset);
        log::debug!(
            "loaded {} records ({} numeric columns, geo: {})",
            dataset.len(),
            schema.numeric.len(),
            schema.geo.is_some()
        );
        self.axes.revalidate(&schema);
        self.dataset = dataset;
        self.schema = schema;
        self.view.phase = phase_after_load(&self.dataset, &self.schema, self.plot_type);
        if self.view.phase == ViewPhase::Ready {
            self.redraw();
        } else {
            self.descriptor = None;
        }
        Ok(())
    }

    /// Synthesizes a fresh descriptor and hands it to the engine. Runs on
    /// every change of plot type, dataset, axis selection, or style; the
    /// previous descriptor is discarded wholesale.
    fn redraw(&mut self) {
        if self.view.phase != ViewPhase::Ready {
            return;
        }
        let descriptor = build_descriptor(
            &self.dataset,
            &self.schema,
            &self.axes,
            &self.style,
            self.plot_type,
        );
        let options = RenderOptions {
            animation_ms: self.style.animation_ms,
            hover_mode: self.style.hover_mode,
        };
        match self.engine.draw(&descriptor, &options) {
            Ok(handle) => self.chart = Some(handle),
            Err(err) => log::warn!("engine draw failed: {err}"),
        }
        self.descriptor = Some(descriptor);
    }

    pub fn set_plot_type(&mut self, plot_type: PlotType) {
        if self.plot_type != plot_type {
            self.plot_type = plot_type;
            self.redraw();
        }
    }

    /// Selects the x axis. Returns `false` (and changes nothing) unless the
    /// column is numeric or the index pseudo-column.
    pub fn set_x_axis(&mut self, column: &str) -> bool {
        if column != INDEX_COLUMN && !self.schema.is_numeric(column) {
            return false;
        }
        if self.axes.x.as_deref() != Some(column) {
            self.axes.x = Some(column.to_string());
            self.redraw();
        }
        true
    }

    /// Selects the y axis. Returns `false` (and changes nothing) unless the
    /// column is numeric.
    pub fn set_y_axis(&mut self, column: &str) -> bool {
        if !self.schema.is_numeric(column) {
            return false;
        }
        if self.axes.y.as_deref() != Some(column) {
            self.axes.y = Some(column.to_string());
            self.redraw();
        }
        true
    }

    /// Replaces the style snapshot wholesale.
    pub fn set_style(&mut self, style: StyleConfig) {
        if self.style != style {
            self.style = style;
            self.redraw();
        }
    }

    /// Applies `f` to a copy of the current snapshot and installs the result.
    pub fn update_style(&mut self, f: impl FnOnce(StyleConfig) -> StyleConfig) {
        let next = f(self.style.clone());
        self.set_style(next);
    }

    /// Consumes an interaction event from the engine. Any explicit axis
    /// range means the user zoomed or panned in.
    pub fn handle_relayout(&mut self, event: &RelayoutEvent) {
        if event.has_explicit_range() {
            self.view.is_zoomed_in = true;
        }
    }

    /// Asks the engine to restore auto-ranging on both axes and clears the
    /// zoom flag.
    pub fn zoom_out(&mut self) {
        let Some(handle) = self.chart else {
            self.view.is_zoomed_in = false;
            return;
        };
        match self.engine.relayout(handle, &LayoutPatch::autorange()) {
            Ok(()) => self.view.is_zoomed_in = false,
            Err(err) => log::warn!("zoom-out relayout failed: {err}"),
        }
    }

    pub fn toggle_settings_panel(&mut self) {
        self.view.show_settings_panel = !self.view.show_settings_panel;
    }

    pub fn toggle_fullscreen(&mut self) {
        self.view.is_fullscreen = !self.view.is_fullscreen;
    }

    /// Exports the live chart under `dir`. Failure is logged and swallowed:
    /// the view state never changes and interaction continues.
    pub fn export(&mut self, dir: &Path) -> Option<PathBuf> {
        let handle = self.chart?;
        let descriptor = self.descriptor.as_ref()?;
        match export::export_chart(&mut self.engine, handle, descriptor, dir) {
            Ok(path) => Some(path),
            Err(err) => {
                log::warn!("chart export failed: {err}");
                None
            }
        }
    }
}
