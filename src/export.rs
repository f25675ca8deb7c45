//! Raster export: engine capture first, direct render as the fallback.
//!
//! Export failure is non-fatal by design — callers log and swallow it, and it
//! never reaches the view state.

use chrono::Local;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::chart_spec::{ChartDescriptor, PlotType};
use crate::engine::{CaptureRequest, ChartHandle, ImageFormat, RenderEngine};

/// Export raster dimensions (CSS pixels) and density multiplier.
pub const EXPORT_WIDTH: u32 = 1600;
pub const EXPORT_HEIGHT: u32 = 900;
pub const EXPORT_SCALE: f64 = 2.0;

/// File name for an export started now: plot type plus a local timestamp.
pub fn export_file_name(plot_type: PlotType) -> String {
    format!(
        "{}_{}.png",
        plot_type.as_str(),
        Local::now().format("%Y%m%d_%H%M%S")
    )
}

/// Captures the live chart through the engine and writes it under `dir`.
///
/// When the engine refuses, falls back to rendering the descriptor's
/// cartesian surface directly; pie/radar/geograph descriptors have no such
/// surface and the fallback reports failure instead.
pub fn export_chart<E: RenderEngine>(
    engine: &mut E,
    handle: ChartHandle,
    descriptor: &ChartDescriptor,
    dir: &Path,
) -> Result<PathBuf> {
    let path = dir.join(export_file_name(descriptor.plot_type));
    let request = CaptureRequest {
        format: ImageFormat::Png,
        width: EXPORT_WIDTH,
        height: EXPORT_HEIGHT,
        scale: EXPORT_SCALE,
    };
    match engine.capture_image(handle, &request) {
        Ok(bytes) => {
            fs::write(&path, bytes)?;
            Ok(path)
        }
        Err(err) => {
            log::warn!("engine capture failed, rendering directly: {err}");
            let scaled = (
                (EXPORT_WIDTH as f64 * EXPORT_SCALE) as u32,
                (EXPORT_HEIGHT as f64 * EXPORT_SCALE) as u32,
            );
            render_descriptor_png(descriptor, &path, scaled)?;
            Ok(path)
        }
    }
}

/// Renders the cartesian surface of `descriptor` to a PNG.
///
/// This is the emergency path, not a styled chart: series marks and optional
/// grid only, no text, so it works without any font stack.
pub fn render_descriptor_png(
    descriptor: &ChartDescriptor,
    path: &Path,
    (width, height): (u32, u32),
) -> Result<()> {
    use plotters::prelude::*;

    let layout = descriptor
        .cartesian_layout()
        .ok_or_else(|| eyre!("no drawable surface for {} charts", descriptor.plot_type.as_str()))?;
    let bounds = layout.bounds.ok_or_else(|| eyre!("No data to export"))?;

    let (x_min, x_max) = pad_range(bounds.x_min, bounds.x_max);
    let (y_min, y_max) = pad_range(bounds.y_min, bounds.y_max);

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut builder = ChartBuilder::on(&root);
    let mut chart = builder
        .margin(30)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    if layout.show_grid {
        chart
            .configure_mesh()
            .disable_x_axis()
            .disable_y_axis()
            .x_labels(0)
            .y_labels(0)
            .draw()?;
    }

    let palette: [RGBColor; 7] = [
        RGBColor(31, 119, 180),
        RGBColor(255, 127, 14),
        RGBColor(44, 160, 44),
        RGBColor(214, 39, 40),
        RGBColor(148, 103, 189),
        RGBColor(140, 86, 75),
        RGBColor(227, 119, 194),
    ];

    let x_span = x_max - x_min;
    for (idx, series) in descriptor.xy_series().enumerate() {
        let points: Vec<(f64, f64)> = series
            .points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        if points.is_empty() {
            continue;
        }
        let color = palette[idx % palette.len()];
        let stroke = color.mix(series.opacity).stroke_width(series.stroke_width);
        let fill = color.mix(series.opacity).filled();
        match descriptor.plot_type {
            PlotType::Line => {
                chart.draw_series(LineSeries::new(points.iter().copied(), stroke))?;
            }
            PlotType::Area => {
                chart.draw_series(
                    AreaSeries::new(points.iter().copied(), 0.0, color.mix(series.opacity * 0.4))
                        .border_style(stroke),
                )?;
            }
            PlotType::Scatter => {
                let radius = series.marker_size.max(1) as i32;
                chart.draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), radius, fill)),
                )?;
            }
            PlotType::Bar => {
                let half = (x_span / points.len().max(1) as f64) * 0.35;
                chart.draw_series(points.iter().map(|&(x, y)| {
                    Rectangle::new([(x - half, 0.0), (x + half, y)], fill)
                }))?;
            }
            // Not cartesian; unreachable behind cartesian_layout above.
            PlotType::Pie | PlotType::Radar | PlotType::GeoGraph => {}
        }
    }

    root.present()?;
    Ok(())
}

/// Widens a degenerate extent so the drawing area is never empty.
fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    }
}
