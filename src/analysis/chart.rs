use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use super::summary::quantile;
use crate::data::classify::{classify, ColumnTypePartition};
use crate::data::error::EmptyNumericSet;
use crate::data::model::{CellValue, Column, TabularDataset};
use crate::settings::Settings;

/// Upper bound on histogram bins, whatever the settings file asks for.
pub const MAX_HISTOGRAM_BINS: usize = 1000;

// ---------------------------------------------------------------------------
// Chart selection
// ---------------------------------------------------------------------------

/// Chart types offered in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Histogram,
    Bar,
    Line,
    Scatter,
    Box,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Histogram,
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Scatter,
        ChartKind::Box,
    ];

    /// Whether the x (or only) column must be numeric.
    pub fn numeric_x(self) -> bool {
        matches!(self, ChartKind::Histogram | ChartKind::Scatter | ChartKind::Box)
    }

    /// Whether the chart has a second, numeric, y column.
    pub fn has_y(self) -> bool {
        matches!(self, ChartKind::Line | ChartKind::Scatter)
    }

    /// Charts that cannot be drawn without numeric columns.
    pub fn needs_numeric(self) -> bool {
        self != ChartKind::Bar
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Histogram => "Histogram",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Line => "Line Chart",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Box => "Box Plot",
        };
        f.write_str(name)
    }
}

/// Chart type plus the chosen columns.  Single-column charts use `x`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartSelection {
    pub kind: ChartKind,
    pub x: Option<String>,
    pub y: Option<String>,
}

impl ChartSelection {
    /// Columns the x selector may offer.
    pub fn x_candidates<'a>(&self, partition: &'a ColumnTypePartition) -> &'a [String] {
        if self.kind.numeric_x() {
            &partition.numeric
        } else {
            &partition.all
        }
    }

    /// Columns the y selector may offer (empty when the chart has no y).
    pub fn y_candidates<'a>(&self, partition: &'a ColumnTypePartition) -> &'a [String] {
        if self.kind.has_y() {
            &partition.numeric
        } else {
            &[]
        }
    }

    /// Replace selections that are not valid for the current kind and
    /// dataset with the first valid column.
    pub fn normalize(&mut self, partition: &ColumnTypePartition) {
        let x_candidates = self.x_candidates(partition);
        if !self.x.as_ref().is_some_and(|x| x_candidates.contains(x)) {
            self.x = x_candidates.first().cloned();
        }
        let y_candidates = self.y_candidates(partition);
        if !self.y.as_ref().is_some_and(|y| y_candidates.contains(y)) {
            self.y = y_candidates.first().cloned();
        }
    }

    pub fn set_kind(&mut self, kind: ChartKind, partition: &ColumnTypePartition) {
        self.kind = kind;
        self.normalize(partition);
    }
}

// ---------------------------------------------------------------------------
// Chart data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error(transparent)]
    NoNumericColumns(#[from] EmptyNumericSet),
    #[error("Select a column for the {0} axis")]
    MissingAxis(&'static str),
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),
    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),
    #[error("Column '{0}' has no values to plot")]
    NoValues(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Counts per distinct value, in value order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueCounts {
    pub column: String,
    pub counts: Vec<(CellValue, usize)>,
}

/// Points for line and scatter charts.
#[derive(Debug, Clone, PartialEq)]
pub struct XySeries {
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<[f64; 2]>,
    /// Tick labels when x is not numeric: points sit at row positions and
    /// `x_categories[row]` names each one.
    pub x_categories: Option<Vec<String>>,
}

/// Five-number summary with 1.5 x IQR whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub column: String,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Histogram { column: String, bins: Vec<HistogramBin> },
    Bar(ValueCounts),
    Line(XySeries),
    Scatter(XySeries),
    Box(BoxSummary),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub data: ChartData,
}

/// Turn a chart selection into plottable data.
pub fn build_chart(
    dataset: &TabularDataset,
    selection: &ChartSelection,
    settings: &Settings,
) -> Result<Chart, ChartError> {
    let partition = classify(dataset);
    if selection.kind.needs_numeric() {
        partition.require_numeric()?;
    }

    let x_name = selection.x.as_deref().ok_or(ChartError::MissingAxis("x"))?;
    let x = lookup(dataset, x_name)?;

    match selection.kind {
        ChartKind::Histogram => {
            let values = finite_values(numeric(x)?);
            if values.is_empty() {
                return Err(ChartError::NoValues(x_name.to_string()));
            }
            Ok(Chart {
                title: format!("Histogram of {x_name}"),
                data: ChartData::Histogram {
                    column: x_name.to_string(),
                    bins: histogram(&values, settings.histogram_bins),
                },
            })
        }
        ChartKind::Bar => Ok(Chart {
            title: format!("Bar Chart of {x_name}"),
            data: ChartData::Bar(value_counts(x)),
        }),
        ChartKind::Box => {
            let values = finite_values(numeric(x)?);
            let summary = box_summary(x_name, values)
                .ok_or_else(|| ChartError::NoValues(x_name.to_string()))?;
            Ok(Chart {
                title: format!("Box Plot of {x_name}"),
                data: ChartData::Box(summary),
            })
        }
        ChartKind::Line | ChartKind::Scatter => {
            let y_name = selection.y.as_deref().ok_or(ChartError::MissingAxis("y"))?;
            let y = numeric(lookup(dataset, y_name)?)?;
            let series = if selection.kind == ChartKind::Scatter {
                scatter_series(numeric(x)?, y)
            } else {
                line_series(x, y)
            };
            Ok(if selection.kind == ChartKind::Scatter {
                Chart {
                    title: format!("Scatter Plot: {x_name} vs {y_name}"),
                    data: ChartData::Scatter(series),
                }
            } else {
                Chart {
                    title: format!("Line Chart: {y_name} over {x_name}"),
                    data: ChartData::Line(series),
                }
            })
        }
    }
}

// -- helpers --

fn lookup<'a>(dataset: &'a TabularDataset, name: &str) -> Result<&'a Column, ChartError> {
    dataset
        .column(name)
        .ok_or_else(|| ChartError::UnknownColumn(name.to_string()))
}

fn numeric(column: &Column) -> Result<&Column, ChartError> {
    if column.kind().is_numeric() {
        Ok(column)
    } else {
        Err(ChartError::NotNumeric(column.name().to_string()))
    }
}

fn finite_values(column: &Column) -> Vec<f64> {
    column
        .numeric_values()
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect()
}

/// Equal-width bins over `[min, max]`; the last bin includes `max`.
/// Without an explicit count, Sturges' rule picks one.
fn histogram(values: &[f64], bins: Option<usize>) -> Vec<HistogramBin> {
    let n_bins = bins
        .filter(|b| *b > 0)
        .unwrap_or_else(|| (values.len() as f64).log2().ceil() as usize + 1)
        .min(MAX_HISTOGRAM_BINS);

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (start, width) = if max > min {
        (min, (max - min) / n_bins as f64)
    } else {
        (min - 0.5, 1.0 / n_bins as f64)
    };

    let mut counts = vec![0usize; n_bins];
    for v in values {
        let idx = (((v - start) / width).floor() as usize).min(n_bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: start + width * i as f64,
            end: start + width * (i + 1) as f64,
            count,
        })
        .collect()
}

fn value_counts(column: &Column) -> ValueCounts {
    let mut counts: BTreeMap<CellValue, usize> = BTreeMap::new();
    for value in column.values().iter().filter(|v| !v.is_missing()) {
        *counts.entry(value.clone()).or_default() += 1;
    }
    ValueCounts {
        column: column.name().to_string(),
        counts: counts.into_iter().collect(),
    }
}

fn box_summary(column: &str, mut values: Vec<f64>) -> Option<BoxSummary> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let q1 = quantile(&values, 0.25);
    let median = quantile(&values, 0.5);
    let q3 = quantile(&values, 0.75);
    let iqr = q3 - q1;
    let (low_fence, high_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    let inside = || values.iter().copied().filter(|v| (low_fence..=high_fence).contains(v));
    let lower_whisker = inside().fold(f64::INFINITY, f64::min);
    let upper_whisker = inside().fold(f64::NEG_INFINITY, f64::max);
    let outliers = values
        .iter()
        .copied()
        .filter(|v| !(low_fence..=high_fence).contains(v))
        .collect();

    Some(BoxSummary {
        column: column.to_string(),
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
    })
}

fn scatter_series(x: &Column, y: &Column) -> XySeries {
    let points = x
        .numeric_values()
        .into_iter()
        .zip(y.numeric_values())
        .filter_map(|(a, b)| Some([a?, b?]))
        .collect();
    XySeries {
        x_label: x.name().to_string(),
        y_label: y.name().to_string(),
        points,
        x_categories: None,
    }
}

/// Numeric x plots against its values; any other x uses the row position
/// and keeps the cell text as tick label.
fn line_series(x: &Column, y: &Column) -> XySeries {
    if x.kind().is_numeric() {
        return scatter_series(x, y);
    }

    let points = y
        .numeric_values()
        .into_iter()
        .enumerate()
        .filter_map(|(row, v)| Some([row as f64, v?]))
        .collect();
    let categories = x
        .values()
        .iter()
        .map(|v| if v.is_missing() { String::new() } else { v.to_string() })
        .collect();

    XySeries {
        x_label: x.name().to_string(),
        y_label: y.name().to_string(),
        points,
        x_categories: Some(categories),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;

    fn dataset(text: &str) -> TabularDataset {
        load_bytes(text.as_bytes(), "data.csv").unwrap()
    }

    fn select(kind: ChartKind, x: &str, y: Option<&str>) -> ChartSelection {
        ChartSelection {
            kind,
            x: Some(x.to_string()),
            y: y.map(str::to_string),
        }
    }

    const SAMPLE: &str = "day,temp,rain,city\nmon,10,0.5,a\ntue,12,,b\nwed,11,1.5,a\nthu,30,0.0,\n";

    #[test]
    fn histogram_bins_cover_every_value() {
        let ds = dataset(SAMPLE);
        let settings = Settings {
            histogram_bins: Some(4),
            ..Settings::default()
        };
        let chart = build_chart(&ds, &select(ChartKind::Histogram, "temp", None), &settings).unwrap();
        assert_eq!(chart.title, "Histogram of temp");
        let ChartData::Histogram { bins, .. } = chart.data else {
            panic!("expected histogram");
        };
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 4);
        assert_eq!(bins[0].start, 10.0);
        assert_eq!(bins[3].end, 30.0);
        assert_eq!(bins[3].count, 1);
    }

    #[test]
    fn sturges_rule_and_constant_columns() {
        let bins = histogram(&[5.0; 8], None);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 8);
        assert!(bins[0].start < 5.0 && bins[3].end > 5.0);
    }

    #[test]
    fn oversized_bin_setting_is_capped() {
        let settings = Settings::from_json(r#"{ "histogram_bins": 4000000000000000000 }"#).unwrap();
        let ds = dataset(SAMPLE);
        let chart = build_chart(&ds, &select(ChartKind::Histogram, "temp", None), &settings).unwrap();
        let ChartData::Histogram { bins, .. } = chart.data else {
            panic!("expected histogram");
        };
        assert_eq!(bins.len(), MAX_HISTOGRAM_BINS);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 4);
    }

    #[test]
    fn bar_chart_counts_any_column() {
        let ds = dataset(SAMPLE);
        let chart =
            build_chart(&ds, &select(ChartKind::Bar, "city", None), &Settings::default()).unwrap();
        let ChartData::Bar(counts) = chart.data else {
            panic!("expected bar chart");
        };
        assert_eq!(
            counts.counts,
            vec![
                (CellValue::Text("a".into()), 2),
                (CellValue::Text("b".into()), 1)
            ]
        );
    }

    #[test]
    fn signed_zeros_share_a_bar() {
        let ds = dataset("v\n0.0\n-0.0\n1.5\n");
        let chart =
            build_chart(&ds, &select(ChartKind::Bar, "v", None), &Settings::default()).unwrap();
        let ChartData::Bar(counts) = chart.data else {
            panic!("expected bar chart");
        };
        assert_eq!(
            counts.counts,
            vec![(CellValue::Float(0.0), 2), (CellValue::Float(1.5), 1)]
        );
    }

    #[test]
    fn line_chart_with_text_x_uses_row_positions() {
        let ds = dataset(SAMPLE);
        let chart = build_chart(
            &ds,
            &select(ChartKind::Line, "day", Some("rain")),
            &Settings::default(),
        )
        .unwrap();
        assert_eq!(chart.title, "Line Chart: rain over day");
        let ChartData::Line(series) = chart.data else {
            panic!("expected line chart");
        };
        assert_eq!(series.points, vec![[0.0, 0.5], [2.0, 1.5], [3.0, 0.0]]);
        assert_eq!(series.x_categories.unwrap()[1], "tue");
    }

    #[test]
    fn scatter_uses_complete_pairs() {
        let ds = dataset(SAMPLE);
        let chart = build_chart(
            &ds,
            &select(ChartKind::Scatter, "temp", Some("rain")),
            &Settings::default(),
        )
        .unwrap();
        assert_eq!(chart.title, "Scatter Plot: temp vs rain");
        let ChartData::Scatter(series) = chart.data else {
            panic!("expected scatter plot");
        };
        assert_eq!(series.points.len(), 3);
        assert!(series.x_categories.is_none());
    }

    #[test]
    fn box_plot_flags_outliers() {
        let summary = box_summary("v", vec![1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(summary.q1, 2.0);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.q3, 4.0);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 4.0);
        assert_eq!(summary.outliers, vec![100.0]);
    }

    #[test]
    fn numeric_charts_without_numeric_columns() {
        let ds = dataset("name,flag\na,true\nb,false\n");
        for kind in [ChartKind::Histogram, ChartKind::Line, ChartKind::Scatter, ChartKind::Box] {
            let err = build_chart(&ds, &select(kind, "name", Some("name")), &Settings::default())
                .unwrap_err();
            assert_eq!(err, ChartError::NoNumericColumns(EmptyNumericSet));
            assert_eq!(err.to_string(), "No numeric columns available");
        }
        assert!(build_chart(&ds, &select(ChartKind::Bar, "flag", None), &Settings::default()).is_ok());
    }

    #[test]
    fn bad_selections_are_reported() {
        let ds = dataset(SAMPLE);
        let settings = Settings::default();
        assert_eq!(
            build_chart(&ds, &select(ChartKind::Box, "city", None), &settings),
            Err(ChartError::NotNumeric("city".into()))
        );
        assert_eq!(
            build_chart(&ds, &select(ChartKind::Bar, "nope", None), &settings),
            Err(ChartError::UnknownColumn("nope".into()))
        );
        assert_eq!(
            build_chart(&ds, &select(ChartKind::Scatter, "temp", None), &settings),
            Err(ChartError::MissingAxis("y"))
        );
    }

    #[test]
    fn normalize_picks_valid_columns() {
        let ds = dataset(SAMPLE);
        let partition = classify(&ds);
        let mut selection = ChartSelection::default();
        selection.normalize(&partition);
        assert_eq!(selection.x.as_deref(), Some("temp"));
        assert_eq!(selection.y, None);

        selection.set_kind(ChartKind::Line, &partition);
        assert_eq!(selection.x.as_deref(), Some("temp"));
        assert_eq!(selection.y.as_deref(), Some("temp"));

        selection.x = Some("day".into());
        selection.set_kind(ChartKind::Bar, &partition);
        assert_eq!(selection.x.as_deref(), Some("day"));
        assert_eq!(selection.y, None);
    }
}
