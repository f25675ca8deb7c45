//! Column classification (numeric / geographic) and default axis selection.
//!
//! Classification looks at the first record only; name heuristics decide the
//! latitude/longitude pair.

use crate::dataset::Dataset;

/// Synthetic x-axis pseudo-column: a record's position in the dataset.
pub const INDEX_COLUMN: &str = "index";

/// Latitude/longitude column pair. Present only when both sides resolve; a
/// one-sided match means geography is unavailable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeoColumns {
    pub lat: String,
    pub lon: String,
}

/// Column semantics derived from a dataset's first record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnSchema {
    /// Columns whose first-record value is numeric or numeric-parseable, in
    /// column order.
    pub numeric: Vec<String>,
    pub geo: Option<GeoColumns>,
}

impl ColumnSchema {
    /// Classifies `dataset`. An empty dataset yields an empty classification.
    pub fn infer(dataset: &Dataset) -> Self {
        let Some(first) = dataset.first_row() else {
            return Self::default();
        };
        let numeric = dataset
            .columns()
            .iter()
            .zip(first)
            .filter(|(_, value)| value.as_number().is_some())
            .map(|(name, _)| name.clone())
            .collect();
        Self {
            numeric,
            geo: detect_geo(dataset.columns()),
        }
    }

    pub fn is_numeric(&self, name: &str) -> bool {
        self.numeric.iter().any(|c| c == name)
    }
}

fn detect_geo(columns: &[String]) -> Option<GeoColumns> {
    let lat = columns.iter().find(|c| {
        let name = c.to_lowercase();
        name.contains("lat") || name == "y"
    })?;
    let lon = columns.iter().find(|c| {
        let name = c.to_lowercase();
        name.contains("lon") || name.contains("lng") || name == "x"
    })?;
    Some(GeoColumns {
        lat: lat.clone(),
        lon: lon.clone(),
    })
}

/// Selected x/y columns. Once set, each stays within the numeric columns
/// (plus [`INDEX_COLUMN`] for x).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxisSelection {
    pub x: Option<String>,
    pub y: Option<String>,
}

impl AxisSelection {
    /// Fills unset axes from the numeric columns: x takes the first, y the
    /// second when one exists. With a single numeric column, y reuses it —
    /// an intentional degenerate duplication, not an error.
    pub fn apply_defaults(&mut self, schema: &ColumnSchema) {
        if self.x.is_none() {
            self.x = schema.numeric.first().cloned();
        }
        if self.y.is_none() {
            self.y = schema
                .numeric
                .get(1)
                .or_else(|| schema.numeric.first())
                .cloned();
        }
    }

    /// Clears selections whose column is gone from `schema`, then re-applies
    /// defaults. Run after wholesale dataset replacement so selections keep
    /// their membership invariant.
    pub fn revalidate(&mut self, schema: &ColumnSchema) {
        if !matches!(&self.x, Some(c) if schema.is_numeric(c) || c == INDEX_COLUMN) {
            self.x = None;
        }
        if !matches!(&self.y, Some(c) if schema.is_numeric(c)) {
            self.y = None;
        }
        self.apply_defaults(schema);
    }
}
