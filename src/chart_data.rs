//! Build chart series and layout from the dataset, axis selection, and style
//! snapshot.
//!
//! Synthesis is a pure function re-run in full whenever any of {plot type,
//! dataset, axis selection, style} changes; descriptors are replaced, never
//! patched.

use crate::chart_spec::{
    CartesianLayout, ChartDescriptor, DataBounds, GeoLayout, GeoSeries, GeoView, LayoutSpec,
    PieLayout, PieSeries, PlotType, RadarLayout, RadarSeries, SeriesSpec, XySeries,
    DEFAULT_MAP_STYLE,
};
use crate::config::StyleConfig;
use crate::dataset::{Dataset, Value};
use crate::schema::{AxisSelection, ColumnSchema, INDEX_COLUMN};

/// Pie charts keep the first distinct group labels up to this cap.
pub const PIE_GROUP_LIMIT: usize = 8;

/// Radar charts take this many leading records, one spoke each.
pub const RADAR_SPOKE_LIMIT: usize = 6;

/// Synthesizes the complete descriptor for one chart.
pub fn build_descriptor(
    dataset: &Dataset,
    schema: &ColumnSchema,
    axes: &AxisSelection,
    style: &StyleConfig,
    plot_type: PlotType,
) -> ChartDescriptor {
    log::debug!(
        "synthesizing {} descriptor over {} records",
        plot_type.as_str(),
        dataset.len()
    );
    match plot_type {
        PlotType::Line | PlotType::Bar | PlotType::Area | PlotType::Scatter => {
            cartesian_descriptor(dataset, axes, style, plot_type)
        }
        PlotType::Pie => pie_descriptor(dataset, axes, style),
        PlotType::Radar => radar_descriptor(dataset, axes, style),
        PlotType::GeoGraph => geo_descriptor(dataset, schema, style),
    }
}

/// Resolved x lookup: a real column, or the synthetic record index.
/// A selected column that vanished from the dataset also falls back to the
/// index; revalidation keeps that from arising in the dashboard flow.
fn x_column(dataset: &Dataset, axes: &AxisSelection) -> Option<usize> {
    axes.x
        .as_deref()
        .filter(|c| *c != INDEX_COLUMN)
        .and_then(|c| dataset.column_index(c))
}

fn x_title(axes: &AxisSelection) -> String {
    axes.x.clone().unwrap_or_else(|| INDEX_COLUMN.to_string())
}

/// Group/category label for a record: the string form of its x value.
fn x_label(dataset: &Dataset, x_col: Option<usize>, row: usize) -> String {
    match x_col {
        Some(col) => dataset.rows()[row]
            .get(col)
            .map(Value::display)
            .unwrap_or_default(),
        None => row.to_string(),
    }
}

fn cartesian_descriptor(
    dataset: &Dataset,
    axes: &AxisSelection,
    style: &StyleConfig,
    plot_type: PlotType,
) -> ChartDescriptor {
    let points = xy_points(dataset, axes);
    let bounds = data_bounds(&points);
    let y_title = axes.y.clone().unwrap_or_default();
    let series = XySeries {
        name: y_title.clone(),
        points,
        stroke_width: style.stroke_width,
        opacity: style.opacity,
        marker_size: style.marker_size,
        curve: style.curve,
    };
    ChartDescriptor {
        plot_type,
        series: vec![SeriesSpec::Xy(series)],
        layout: LayoutSpec::Cartesian(CartesianLayout {
            x_title: x_title(axes),
            y_title,
            show_grid: style.show_grid,
            show_legend: style.show_legend,
            bounds,
        }),
    }
}

/// Builds the (x, y) pair sequence. Pairs whose y value is not finite
/// (non-numeric, NaN, or missing) are dropped; x is never filtered.
fn xy_points(dataset: &Dataset, axes: &AxisSelection) -> Vec<(f64, f64)> {
    let Some(y_col) = axes.y.as_deref().and_then(|c| dataset.column_index(c)) else {
        return Vec::new();
    };
    let x_col = x_column(dataset, axes);
    dataset
        .rows()
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let y = row.get(y_col).and_then(Value::as_number)?;
            let x = match x_col {
                Some(col) => row.get(col).and_then(Value::as_number).unwrap_or(f64::NAN),
                None => i as f64,
            };
            Some((x, y))
        })
        .collect()
}

/// Finite extent of the pair sequence; `None` when there are no pairs. When
/// no x is finite the x extent falls back to the (0, 1) placeholder.
fn data_bounds(points: &[(f64, f64)]) -> Option<DataBounds> {
    if points.is_empty() {
        return None;
    }
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &(x, y) in points {
        if x.is_finite() {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
        }
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    let (x_min, x_max) = if x_max >= x_min {
        (x_min, x_max)
    } else {
        (0.0, 1.0)
    };
    Some(DataBounds {
        x_min,
        x_max,
        y_min,
        y_max,
    })
}

fn pie_descriptor(dataset: &Dataset, axes: &AxisSelection, style: &StyleConfig) -> ChartDescriptor {
    let (labels, values) = pie_groups(dataset, axes);
    ChartDescriptor {
        plot_type: PlotType::Pie,
        series: vec![SeriesSpec::Pie(PieSeries {
            labels,
            values,
            opacity: style.opacity,
        })],
        layout: LayoutSpec::Pie(PieLayout {
            show_legend: style.show_legend,
        }),
    }
}

/// Groups records by the string form of their x value, summing y per group.
/// Unlike the cartesian pipeline there is no finite filter here: a y value
/// that fails numeric coercion contributes 0 instead of dropping the record.
/// The first `PIE_GROUP_LIMIT` distinct labels are kept in first-encountered
/// order; later groups are discarded.
fn pie_groups(dataset: &Dataset, axes: &AxisSelection) -> (Vec<String>, Vec<f64>) {
    let x_col = x_column(dataset, axes);
    let y_col = axes.y.as_deref().and_then(|c| dataset.column_index(c));
    let mut labels: Vec<String> = Vec::new();
    let mut values: Vec<f64> = Vec::new();
    for i in 0..dataset.len() {
        let label = x_label(dataset, x_col, i);
        let y = y_col
            .and_then(|col| dataset.rows()[i].get(col))
            .map(Value::as_number_or_zero)
            .unwrap_or(0.0);
        match labels.iter().position(|l| *l == label) {
            Some(at) => values[at] += y,
            None => {
                labels.push(label);
                values.push(y);
            }
        }
    }
    labels.truncate(PIE_GROUP_LIMIT);
    values.truncate(PIE_GROUP_LIMIT);
    (labels, values)
}

/// One spoke per record, first `RADAR_SPOKE_LIMIT` records only. As with pie,
/// non-finite y values coerce to 0 rather than dropping the record.
fn radar_descriptor(
    dataset: &Dataset,
    axes: &AxisSelection,
    style: &StyleConfig,
) -> ChartDescriptor {
    let x_col = x_column(dataset, axes);
    let y_col = axes.y.as_deref().and_then(|c| dataset.column_index(c));
    let take = dataset.len().min(RADAR_SPOKE_LIMIT);
    let mut categories = Vec::with_capacity(take);
    let mut values = Vec::with_capacity(take);
    for i in 0..take {
        categories.push(x_label(dataset, x_col, i));
        values.push(
            y_col
                .and_then(|col| dataset.rows()[i].get(col))
                .map(Value::as_number_or_zero)
                .unwrap_or(0.0),
        );
    }
    ChartDescriptor {
        plot_type: PlotType::Radar,
        series: vec![SeriesSpec::Radar(RadarSeries {
            name: axes.y.clone().unwrap_or_default(),
            categories,
            values,
            stroke_width: style.stroke_width,
            opacity: style.opacity,
        })],
        layout: LayoutSpec::Radar(RadarLayout {
            show_grid: style.show_grid,
            show_legend: style.show_legend,
        }),
    }
}

/// Discrete zoom from the larger of the latitude/longitude spans; zoom is
/// non-increasing as the span grows.
pub fn zoom_for_range(range: f64) -> u8 {
    if range < 1.0 {
        8
    } else if range < 5.0 {
        6
    } else if range < 20.0 {
        4
    } else if range < 50.0 {
        3
    } else {
        2
    }
}

fn geo_descriptor(dataset: &Dataset, schema: &ColumnSchema, style: &StyleConfig) -> ChartDescriptor {
    let unavailable = |series: Vec<SeriesSpec>| ChartDescriptor {
        plot_type: PlotType::GeoGraph,
        series,
        layout: LayoutSpec::Geo(GeoLayout {
            view: None,
            map_style: DEFAULT_MAP_STYLE.to_string(),
        }),
    };

    let Some(geo) = &schema.geo else {
        return unavailable(Vec::new());
    };
    let (Some(lat_col), Some(lon_col)) = (
        dataset.column_index(&geo.lat),
        dataset.column_index(&geo.lon),
    ) else {
        return unavailable(Vec::new());
    };

    // Keep only records where both coordinates are present and finite.
    let mut lats = Vec::new();
    let mut lons = Vec::new();
    for row in dataset.rows() {
        let lat = row.get(lat_col).and_then(Value::as_number);
        let lon = row.get(lon_col).and_then(Value::as_number);
        if let (Some(lat), Some(lon)) = (lat, lon) {
            lats.push(lat);
            lons.push(lon);
        }
    }
    if lats.is_empty() {
        return unavailable(Vec::new());
    }

    let n = lats.len() as f64;
    let center_lat = lats.iter().sum::<f64>() / n;
    let center_lon = lons.iter().sum::<f64>() / n;
    let span = |vs: &[f64]| {
        let min = vs.iter().copied().fold(f64::INFINITY, f64::min);
        let max = vs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        max - min
    };
    let range = span(&lats).max(span(&lons));

    ChartDescriptor {
        plot_type: PlotType::GeoGraph,
        series: vec![SeriesSpec::Geo(GeoSeries {
            lats,
            lons,
            marker_size: style.marker_size,
            opacity: style.opacity,
        })],
        layout: LayoutSpec::Geo(GeoLayout {
            view: Some(GeoView {
                center_lat,
                center_lon,
                zoom: zoom_for_range(range),
            }),
            map_style: DEFAULT_MAP_STYLE.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{build_descriptor, zoom_for_range, PIE_GROUP_LIMIT, RADAR_SPOKE_LIMIT};
    use crate::chart_spec::{LayoutSpec, PlotType, SeriesSpec};
    use crate::config::StyleConfig;
    use crate::dataset::parse_csv;
    use crate::schema::{AxisSelection, ColumnSchema, INDEX_COLUMN};

    fn axes(x: &str, y: &str) -> AxisSelection {
        AxisSelection {
            x: Some(x.into()),
            y: Some(y.into()),
        }
    }

    fn single_xy(d: &crate::chart_spec::ChartDescriptor) -> &crate::chart_spec::XySeries {
        match &d.series[0] {
            SeriesSpec::Xy(s) => s,
            other => panic!("expected xy series, got {other:?}"),
        }
    }

    #[test]
    fn cartesian_drops_non_finite_y() {
        let data = parse_csv("x,y\n1,10\n2,\n3,oops\n4,40\n").unwrap();
        let schema = ColumnSchema::infer(&data);
        let d = build_descriptor(
            &data,
            &schema,
            &axes("x", "y"),
            &StyleConfig::default(),
            PlotType::Line,
        );
        assert_eq!(single_xy(&d).points, vec![(1.0, 10.0), (4.0, 40.0)]);
    }

    #[test]
    fn cartesian_layout_carries_axis_titles_and_bounds() {
        let data = parse_csv("t,v\n1,5\n3,9\n").unwrap();
        let schema = ColumnSchema::infer(&data);
        let d = build_descriptor(
            &data,
            &schema,
            &axes("t", "v"),
            &StyleConfig::default(),
            PlotType::Scatter,
        );
        let layout = d.cartesian_layout().unwrap();
        assert_eq!(layout.x_title, "t");
        assert_eq!(layout.y_title, "v");
        let bounds = layout.bounds.unwrap();
        assert_eq!((bounds.x_min, bounds.x_max), (1.0, 3.0));
        assert_eq!((bounds.y_min, bounds.y_max), (5.0, 9.0));
    }

    #[test]
    fn index_pseudo_column_enumerates_records() {
        let data = parse_csv("v\n7\n8\n9\n").unwrap();
        let schema = ColumnSchema::infer(&data);
        let d = build_descriptor(
            &data,
            &schema,
            &axes(INDEX_COLUMN, "v"),
            &StyleConfig::default(),
            PlotType::Line,
        );
        assert_eq!(single_xy(&d).points, vec![(0.0, 7.0), (1.0, 8.0), (2.0, 9.0)]);
    }

    #[test]
    fn degenerate_same_column_for_both_axes() {
        let data = parse_csv("sales\n3\n5\n").unwrap();
        let schema = ColumnSchema::infer(&data);
        let d = build_descriptor(
            &data,
            &schema,
            &axes("sales", "sales"),
            &StyleConfig::default(),
            PlotType::Line,
        );
        assert_eq!(single_xy(&d).points, vec![(3.0, 3.0), (5.0, 5.0)]);
    }

    #[test]
    fn styling_comes_from_the_snapshot() {
        let data = parse_csv("x,y\n1,2\n").unwrap();
        let schema = ColumnSchema::infer(&data);
        let style = StyleConfig::default()
            .with_stroke_width(5)
            .with_opacity(0.4)
            .with_marker_size(11);
        let d = build_descriptor(&data, &schema, &axes("x", "y"), &style, PlotType::Line);
        let s = single_xy(&d);
        assert_eq!(s.stroke_width, 5);
        assert_eq!(s.opacity, 0.4);
        assert_eq!(s.marker_size, 11);
    }

    #[test]
    fn pie_groups_by_string_form_and_sums() {
        let data = parse_csv("k,v\nA,1\nA,2\nB,3\nC,4\nC,5\nC,6\n").unwrap();
        let schema = ColumnSchema::infer(&data);
        let d = build_descriptor(
            &data,
            &schema,
            &axes("k", "v"),
            &StyleConfig::default(),
            PlotType::Pie,
        );
        let SeriesSpec::Pie(pie) = &d.series[0] else {
            panic!("expected pie series");
        };
        assert_eq!(pie.labels, ["A", "B", "C"]);
        assert_eq!(pie.values, [3.0, 3.0, 15.0]);
    }

    #[test]
    fn pie_coerces_bad_y_to_zero_instead_of_dropping() {
        let data = parse_csv("k,v\nA,1\nA,oops\nA,\nB,2\n").unwrap();
        let schema = ColumnSchema::infer(&data);
        let d = build_descriptor(
            &data,
            &schema,
            &axes("k", "v"),
            &StyleConfig::default(),
            PlotType::Pie,
        );
        let SeriesSpec::Pie(pie) = &d.series[0] else {
            panic!("expected pie series");
        };
        assert_eq!(pie.labels, ["A", "B"]);
        assert_eq!(pie.values, [1.0, 2.0]);
    }

    #[test]
    fn pie_caps_groups_at_limit_in_first_seen_order() {
        let mut text = String::from("k,v\n");
        for i in 0..12 {
            text.push_str(&format!("g{i},1\n"));
        }
        // repeats of an early group after the cap still exist in the input
        text.push_str("g0,1\n");
        let data = parse_csv(&text).unwrap();
        let schema = ColumnSchema::infer(&data);
        let d = build_descriptor(
            &data,
            &schema,
            &axes("k", "v"),
            &StyleConfig::default(),
            PlotType::Pie,
        );
        let SeriesSpec::Pie(pie) = &d.series[0] else {
            panic!("expected pie series");
        };
        assert_eq!(pie.labels.len(), PIE_GROUP_LIMIT);
        assert_eq!(pie.labels[0], "g0");
        assert_eq!(pie.labels[7], "g7");
        assert_eq!(pie.values[0], 2.0);
    }

    #[test]
    fn radar_takes_first_six_records() {
        let data = parse_csv("k,v\na,1\nb,2\nc,3\nd,4\ne,5\nf,6\ng,7\n").unwrap();
        let schema = ColumnSchema::infer(&data);
        let d = build_descriptor(
            &data,
            &schema,
            &axes("k", "v"),
            &StyleConfig::default(),
            PlotType::Radar,
        );
        let SeriesSpec::Radar(radar) = &d.series[0] else {
            panic!("expected radar series");
        };
        assert_eq!(radar.categories.len(), RADAR_SPOKE_LIMIT);
        assert_eq!(radar.categories, ["a", "b", "c", "d", "e", "f"]);
        assert_eq!(radar.values, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(matches!(d.layout, LayoutSpec::Radar(_)));
    }

    #[test]
    fn zoom_is_non_increasing_across_thresholds() {
        assert_eq!(zoom_for_range(0.5), 8);
        assert_eq!(zoom_for_range(4.0), 6);
        assert_eq!(zoom_for_range(10.0), 4);
        assert_eq!(zoom_for_range(40.0), 3);
        assert_eq!(zoom_for_range(100.0), 2);
    }

    #[test]
    fn geograph_centers_on_mean_and_filters_bad_rows() {
        let data = parse_csv("lat,lon,v\n10,20,1\n20,40,2\noops,50,3\n").unwrap();
        let schema = ColumnSchema::infer(&data);
        let d = build_descriptor(
            &data,
            &schema,
            &AxisSelection::default(),
            &StyleConfig::default(),
            PlotType::GeoGraph,
        );
        let SeriesSpec::Geo(geo) = &d.series[0] else {
            panic!("expected geo series");
        };
        assert_eq!(geo.lats, [10.0, 20.0]);
        assert_eq!(geo.lons, [20.0, 40.0]);
        let LayoutSpec::Geo(layout) = &d.layout else {
            panic!("expected geo layout");
        };
        let view = layout.view.unwrap();
        assert_eq!(view.center_lat, 15.0);
        assert_eq!(view.center_lon, 30.0);
        // range = max(10, 20) = 20, on the threshold
        assert_eq!(view.zoom, 3);
    }

    #[test]
    fn geograph_without_geo_columns_is_unavailable() {
        let data = parse_csv("a,b\n1,2\n").unwrap();
        let schema = ColumnSchema::infer(&data);
        let d = build_descriptor(
            &data,
            &schema,
            &AxisSelection::default(),
            &StyleConfig::default(),
            PlotType::GeoGraph,
        );
        assert!(d.series.is_empty());
        let LayoutSpec::Geo(layout) = &d.layout else {
            panic!("expected geo layout");
        };
        assert!(layout.view.is_none());
    }

    #[test]
    fn geograph_with_no_finite_pairs_is_unavailable() {
        let data = parse_csv("lat,lon\n1,x\ny,2\n").unwrap();
        let schema = ColumnSchema::infer(&data);
        let d = build_descriptor(
            &data,
            &schema,
            &AxisSelection::default(),
            &StyleConfig::default(),
            PlotType::GeoGraph,
        );
        assert!(d.series.is_empty());
        let LayoutSpec::Geo(layout) = &d.layout else {
            panic!("expected geo layout");
        };
        assert!(layout.view.is_none());
    }

    #[test]
    fn synthesis_is_pure() {
        let data = parse_csv("x,y\n1,2\n3,4\n").unwrap();
        let schema = ColumnSchema::infer(&data);
        let style = StyleConfig::default();
        let a = build_descriptor(&data, &schema, &axes("x", "y"), &style, PlotType::Area);
        let b = build_descriptor(&data, &schema, &axes("x", "y"), &style, PlotType::Area);
        assert_eq!(a, b);
    }
}
