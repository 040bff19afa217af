use std::collections::{BTreeSet, HashMap};
use std::fmt;

use thiserror::Error;

use crate::data::model::{CellValue, Column, ColumnKind, TabularDataset};

// ---------------------------------------------------------------------------
// Overview: shape, column kinds, missing values
// ---------------------------------------------------------------------------

/// Shape, kind counts and missing counts of a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetOverview {
    pub n_rows: usize,
    pub n_columns: usize,
    /// Number of columns per kind, only kinds that occur.
    pub kind_counts: Vec<(ColumnKind, usize)>,
    /// Missing cells per column, in column order.
    pub missing: Vec<(String, usize)>,
}

pub fn overview(dataset: &TabularDataset) -> DatasetOverview {
    let kind_counts = ColumnKind::ALL
        .iter()
        .map(|&kind| {
            let n = dataset.columns().iter().filter(|c| c.kind() == kind).count();
            (kind, n)
        })
        .filter(|(_, n)| *n > 0)
        .collect();

    let missing = dataset
        .columns()
        .iter()
        .map(|c| (c.name().to_string(), c.missing_count()))
        .collect();

    DatasetOverview {
        n_rows: dataset.n_rows(),
        n_columns: dataset.n_columns(),
        kind_counts,
        missing,
    }
}

/// The first `n` rows (fewer if the dataset is shorter).
pub fn head(dataset: &TabularDataset, n: usize) -> Vec<Vec<&CellValue>> {
    (0..n.min(dataset.n_rows()))
        .filter_map(|i| dataset.row(i))
        .collect()
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// Row labels of the summary table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Statistic {
    Count,
    Unique,
    Top,
    Freq,
    Mean,
    Std,
    Min,
    P25,
    P50,
    P75,
    Max,
}

impl Statistic {
    pub const NUMERIC: [Statistic; 8] = [
        Statistic::Count,
        Statistic::Mean,
        Statistic::Std,
        Statistic::Min,
        Statistic::P25,
        Statistic::P50,
        Statistic::P75,
        Statistic::Max,
    ];

    pub const CATEGORICAL: [Statistic; 4] = [
        Statistic::Count,
        Statistic::Unique,
        Statistic::Top,
        Statistic::Freq,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Statistic::Count => "count",
            Statistic::Unique => "unique",
            Statistic::Top => "top",
            Statistic::Freq => "freq",
            Statistic::Mean => "mean",
            Statistic::Std => "std",
            Statistic::Min => "min",
            Statistic::P25 => "25%",
            Statistic::P50 => "50%",
            Statistic::P75 => "75%",
            Statistic::Max => "max",
        }
    }
}

/// One cell of the summary table.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryCell {
    Number(f64),
    Value(CellValue),
    /// Statistic does not apply to this column.
    Empty,
}

impl fmt::Display for SummaryCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryCell::Number(v) if v.is_nan() => write!(f, "NaN"),
            SummaryCell::Number(v) if v.fract() == 0.0 => write!(f, "{v}"),
            SummaryCell::Number(v) => write!(f, "{v:.4}"),
            SummaryCell::Value(v) => write!(f, "{v}"),
            SummaryCell::Empty => Ok(()),
        }
    }
}

/// Statistics of one column, aligned with [`SummaryTable::statistics`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub cells: Vec<SummaryCell>,
}

/// Statistics (rows) by column (columns).
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub statistics: Vec<Statistic>,
    pub columns: Vec<ColumnSummary>,
}

impl SummaryTable {
    pub fn get(&self, column: &str, statistic: Statistic) -> Option<&SummaryCell> {
        let row = self.statistics.iter().position(|s| *s == statistic)?;
        self.columns
            .iter()
            .find(|c| c.name == column)
            .and_then(|c| c.cells.get(row))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("Cannot describe a dataset without columns")]
    NoColumns,
}

/// Descriptive statistics.
///
/// Default: numeric columns with count, mean, std, min, quartiles and max;
/// when there are no numeric columns every column is described with count,
/// unique, top and freq instead.  `include_all` describes every column with
/// the union of both sets, leaving cells that do not apply empty.
pub fn describe(dataset: &TabularDataset, include_all: bool) -> Result<SummaryTable, StatsError> {
    if dataset.n_columns() == 0 {
        return Err(StatsError::NoColumns);
    }

    let numeric: Vec<&Column> = dataset
        .columns()
        .iter()
        .filter(|c| c.kind().is_numeric())
        .collect();

    let selected: Vec<&Column> = if include_all || numeric.is_empty() {
        dataset.columns().iter().collect()
    } else {
        numeric
    };

    let has_numeric = selected.iter().any(|c| c.kind().is_numeric());
    let has_other = selected.iter().any(|c| !c.kind().is_numeric());

    let mut statistics: BTreeSet<Statistic> = BTreeSet::new();
    if has_numeric {
        statistics.extend(Statistic::NUMERIC);
    }
    if has_other {
        statistics.extend(Statistic::CATEGORICAL);
    }
    let statistics: Vec<Statistic> = statistics.into_iter().collect();

    let columns = selected
        .into_iter()
        .map(|column| {
            let cells = if column.kind().is_numeric() {
                let stats = NumericStats::of(column);
                statistics.iter().map(|s| stats.cell(*s)).collect()
            } else {
                let stats = CategoricalStats::of(column);
                statistics.iter().map(|s| stats.cell(*s)).collect()
            };
            ColumnSummary {
                name: column.name().to_string(),
                cells,
            }
        })
        .collect();

    Ok(SummaryTable {
        statistics,
        columns,
    })
}

struct NumericStats {
    count: usize,
    mean: f64,
    std: f64,
    sorted: Vec<f64>,
}

impl NumericStats {
    fn of(column: &Column) -> Self {
        let mut sorted: Vec<f64> = column.numeric_values().into_iter().flatten().collect();
        sorted.sort_by(f64::total_cmp);
        let count = sorted.len();
        let mean = mean(&sorted);
        let std = sample_std(&sorted, mean);
        Self {
            count,
            mean,
            std,
            sorted,
        }
    }

    fn cell(&self, statistic: Statistic) -> SummaryCell {
        let value = match statistic {
            Statistic::Count => self.count as f64,
            Statistic::Mean => self.mean,
            Statistic::Std => self.std,
            Statistic::Min => quantile(&self.sorted, 0.0),
            Statistic::P25 => quantile(&self.sorted, 0.25),
            Statistic::P50 => quantile(&self.sorted, 0.5),
            Statistic::P75 => quantile(&self.sorted, 0.75),
            Statistic::Max => quantile(&self.sorted, 1.0),
            Statistic::Unique | Statistic::Top | Statistic::Freq => return SummaryCell::Empty,
        };
        SummaryCell::Number(value)
    }
}

struct CategoricalStats {
    count: usize,
    unique: usize,
    top: Option<(CellValue, usize)>,
}

impl CategoricalStats {
    fn of(column: &Column) -> Self {
        // value -> (first position, count); ties on count go to the earliest value.
        let mut counts: HashMap<&CellValue, (usize, usize)> = HashMap::new();
        for (pos, value) in column.values().iter().filter(|v| !v.is_missing()).enumerate() {
            counts.entry(value).or_insert((pos, 0)).1 += 1;
        }

        let count = counts.values().map(|(_, n)| n).sum();
        let unique = counts.len();
        let top = counts
            .into_iter()
            .min_by(|(_, (pos_a, n_a)), (_, (pos_b, n_b))| n_b.cmp(n_a).then(pos_a.cmp(pos_b)))
            .map(|(value, (_, n))| (value.clone(), n));
        Self { count, unique, top }
    }

    fn cell(&self, statistic: Statistic) -> SummaryCell {
        match statistic {
            Statistic::Count => SummaryCell::Number(self.count as f64),
            Statistic::Unique => SummaryCell::Number(self.unique as f64),
            Statistic::Top => self
                .top
                .as_ref()
                .map_or(SummaryCell::Empty, |(v, _)| SummaryCell::Value(v.clone())),
            Statistic::Freq => self
                .top
                .as_ref()
                .map_or(SummaryCell::Empty, |(_, n)| SummaryCell::Number(*n as f64)),
            _ => SummaryCell::Empty,
        }
    }
}

// -- numeric helpers --

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with one degree of freedom removed; NaN below two values.
pub(crate) fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Linear-interpolated quantile of sorted values; NaN when empty.
pub(crate) fn quantile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;

    fn dataset(text: &str) -> TabularDataset {
        load_bytes(text.as_bytes(), "data.csv").unwrap()
    }

    fn number(table: &SummaryTable, column: &str, statistic: Statistic) -> f64 {
        match table.get(column, statistic) {
            Some(SummaryCell::Number(v)) => *v,
            other => panic!("expected a number for {column}/{statistic:?}, got {other:?}"),
        }
    }

    #[test]
    fn overview_counts_shape_kinds_and_missing() {
        let ds = dataset("a,b,c\n1,x,\n,y,2.5\n3,,1\n");
        let o = overview(&ds);
        assert_eq!((o.n_rows, o.n_columns), (3, 3));
        assert_eq!(
            o.kind_counts,
            vec![(ColumnKind::Integer, 1), (ColumnKind::Float, 1), (ColumnKind::Text, 1)]
        );
        assert_eq!(
            o.missing,
            vec![("a".to_string(), 1), ("b".to_string(), 1), ("c".to_string(), 1)]
        );
    }

    #[test]
    fn head_is_bounded_by_row_count() {
        let ds = dataset("a\n1\n2\n3\n");
        assert_eq!(head(&ds, 2).len(), 2);
        assert_eq!(head(&ds, 10).len(), 3);
        assert_eq!(head(&ds, 1)[0], vec![&CellValue::Integer(1)]);
    }

    #[test]
    fn numeric_describe_matches_hand_computation() {
        let ds = dataset("v,label\n1,a\n2,b\n3,a\n4,\n");
        let table = describe(&ds, false).unwrap();
        assert_eq!(table.statistics, Statistic::NUMERIC.to_vec());
        assert_eq!(table.columns.len(), 1);
        assert_eq!(number(&table, "v", Statistic::Count), 4.0);
        assert_eq!(number(&table, "v", Statistic::Mean), 2.5);
        assert!((number(&table, "v", Statistic::Std) - 1.290_994_448_7).abs() < 1e-9);
        assert_eq!(number(&table, "v", Statistic::Min), 1.0);
        assert_eq!(number(&table, "v", Statistic::P25), 1.75);
        assert_eq!(number(&table, "v", Statistic::P50), 2.5);
        assert_eq!(number(&table, "v", Statistic::P75), 3.25);
        assert_eq!(number(&table, "v", Statistic::Max), 4.0);
    }

    #[test]
    fn include_all_unions_both_statistic_sets() {
        let ds = dataset("v,label\n1,a\n2,b\n3,a\n4,\n");
        let table = describe(&ds, true).unwrap();
        assert_eq!(table.statistics.len(), 11);
        assert_eq!(table.get("v", Statistic::Top), Some(&SummaryCell::Empty));
        assert_eq!(table.get("label", Statistic::Mean), Some(&SummaryCell::Empty));
        assert_eq!(number(&table, "label", Statistic::Count), 3.0);
        assert_eq!(number(&table, "label", Statistic::Unique), 2.0);
        assert_eq!(
            table.get("label", Statistic::Top),
            Some(&SummaryCell::Value(CellValue::Text("a".into())))
        );
        assert_eq!(number(&table, "label", Statistic::Freq), 2.0);
    }

    #[test]
    fn text_only_dataset_is_described_categorically() {
        let ds = dataset("name,flag\nann,true\nbob,true\n");
        let table = describe(&ds, false).unwrap();
        assert_eq!(table.statistics, Statistic::CATEGORICAL.to_vec());
        assert_eq!(table.columns.len(), 2);
        assert_eq!(
            table.get("flag", Statistic::Top),
            Some(&SummaryCell::Value(CellValue::Bool(true)))
        );
    }

    #[test]
    fn top_value_ties_go_to_the_first_seen() {
        let ds = dataset("k\nb\na\na\nb\nc\n");
        let table = describe(&ds, false).unwrap();
        assert_eq!(
            table.get("k", Statistic::Top),
            Some(&SummaryCell::Value(CellValue::Text("b".into())))
        );
        assert_eq!(number(&table, "k", Statistic::Freq), 2.0);
        assert_eq!(number(&table, "k", Statistic::Unique), 3.0);
    }

    #[test]
    fn large_unique_text_column() {
        let mut text = String::from("id\n");
        for i in 0..60_000 {
            text.push_str(&format!("k{i}\n"));
        }
        let ds = dataset(&text);

        let started = std::time::Instant::now();
        let table = describe(&ds, true).unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(5));

        assert_eq!(number(&table, "id", Statistic::Count), 60_000.0);
        assert_eq!(number(&table, "id", Statistic::Unique), 60_000.0);
        assert_eq!(
            table.get("id", Statistic::Top),
            Some(&SummaryCell::Value(CellValue::Text("k0".into())))
        );
        assert_eq!(number(&table, "id", Statistic::Freq), 1.0);
    }

    #[test]
    fn describing_nothing_is_an_error() {
        assert_eq!(
            describe(&TabularDataset::empty(), false),
            Err(StatsError::NoColumns)
        );
    }

    #[test]
    fn single_value_has_no_std() {
        let ds = dataset("v\n7\n");
        let table = describe(&ds, false).unwrap();
        assert!(number(&table, "v", Statistic::Std).is_nan());
        assert_eq!(number(&table, "v", Statistic::P75), 7.0);
    }

    #[test]
    fn summary_cells_display_compactly() {
        assert_eq!(SummaryCell::Number(3.0).to_string(), "3");
        assert_eq!(SummaryCell::Number(1.234_567).to_string(), "1.2346");
        assert_eq!(SummaryCell::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(SummaryCell::Empty.to_string(), "");
    }
}
