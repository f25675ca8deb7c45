//! Export adapter flows: engine capture, direct-render fallback, and the
//! non-fatal failure contract.

use plotdash::export::{EXPORT_HEIGHT, EXPORT_SCALE, EXPORT_WIDTH};
use plotdash::{Dashboard, DashboardConfig, PlotType, ViewPhase};

mod common;
use common::{ScriptedEngine, StaticSource, CAPTURE_BYTES};

fn ready_dashboard(plot_type: PlotType, fail_capture: bool) -> Dashboard<ScriptedEngine> {
    let (mut engine, _) = ScriptedEngine::new();
    engine.fail_capture = fail_capture;
    let config = DashboardConfig {
        plot_type,
        ..DashboardConfig::default()
    };
    let mut dash = Dashboard::with_source(
        engine,
        Box::new(StaticSource("x,y\n1,10\n2,20\n3,15\n".into())),
        config,
    );
    dash.refresh();
    assert_eq!(dash.view().phase, ViewPhase::Ready);
    dash
}

#[test]
fn export_writes_the_engine_capture() {
    let dir = tempfile::tempdir().unwrap();
    let mut dash = ready_dashboard(PlotType::Line, false);

    let path = dash.export(dir.path()).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), CAPTURE_BYTES);

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("line_"));
    assert!(name.ends_with(".png"));
}

#[test]
fn capture_request_uses_the_fixed_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let (mut engine, log) = ScriptedEngine::new();
    engine.fail_capture = false;
    let mut dash = Dashboard::with_source(
        engine,
        Box::new(StaticSource("x,y\n1,2\n".into())),
        DashboardConfig::default(),
    );
    dash.refresh();
    dash.export(dir.path()).unwrap();

    let log = log.borrow();
    assert_eq!(log.captures.len(), 1);
    assert_eq!(log.captures[0].width, EXPORT_WIDTH);
    assert_eq!(log.captures[0].height, EXPORT_HEIGHT);
    assert_eq!(log.captures[0].scale, EXPORT_SCALE);
}

#[test]
fn engine_refusal_falls_back_to_direct_render() {
    let dir = tempfile::tempdir().unwrap();
    let mut dash = ready_dashboard(PlotType::Scatter, true);

    let path = dash.export(dir.path()).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_ne!(bytes, CAPTURE_BYTES);
    // the fallback encodes a real PNG
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn export_failure_is_swallowed_and_nonfatal() {
    let dir = tempfile::tempdir().unwrap();
    // pie has no cartesian surface, so both paths fail
    let mut dash = ready_dashboard(PlotType::Pie, true);

    assert!(dash.export(dir.path()).is_none());
    assert_eq!(dash.view().phase, ViewPhase::Ready);
    assert!(dash.view().error_message.is_none());

    // the dashboard keeps working afterwards
    dash.set_plot_type(PlotType::Bar);
    assert_eq!(dash.descriptor().unwrap().plot_type, PlotType::Bar);
}

#[test]
fn export_without_a_live_chart_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, _) = ScriptedEngine::new();
    let mut dash = Dashboard::with_source(
        engine,
        Box::new(StaticSource("x,y\n1,2\n".into())),
        DashboardConfig::default(),
    );
    // no refresh: nothing has been drawn yet
    assert!(dash.export(dir.path()).is_none());
}
