//! Bounds dataset size by uniform stride selection.

use crate::dataset::Dataset;

/// Maximum record count kept for the rendering engine.
pub const MAX_POINTS: usize = 2000;

/// Thins `dataset` to at most `max_points` rows.
///
/// At or under the bound the dataset is returned unchanged. Otherwise every
/// `stride`-th row is kept starting at index 0, with `stride = len /
/// max_points`, and the selection is truncated to `max_points` rows. The
/// output is a strictly increasing index subsequence of the input and the
/// operation is idempotent on its own output. A bound of zero disables
/// thinning (an unlimited row limit).
pub fn sample(dataset: Dataset, max_points: usize) -> Dataset {
    if max_points == 0 || dataset.len() <= max_points {
        return dataset;
    }
    let stride = dataset.len() / max_points;
    let (columns, rows) = dataset.into_parts();
    let rows = rows.into_iter().step_by(stride).take(max_points).collect();
    Dataset::from_parts(columns, rows)
}
