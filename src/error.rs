//! Error taxonomy for the dashboard pipeline.

use thiserror::Error;

/// Failures surfaced by the data pipeline.
///
/// Both put the dashboard into the `Error` view phase; recovery is an
/// explicit refresh. Engine-side failures are a separate type
/// ([`crate::engine::EngineError`]) because they never reach the view state.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure or non-success status while fetching the CSV payload.
    #[error("network: {0}")]
    Network(String),
    /// Structurally malformed CSV payload.
    #[error("parse: {0}")]
    Parse(String),
}
