use std::collections::BTreeSet;
use std::fmt;

use super::error::DatasetError;

// ---------------------------------------------------------------------------
// ColumnKind – the semantic type of a whole column
// ---------------------------------------------------------------------------

/// Closed set of column types, decided once when the file is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
    Boolean,
    Date,
}

impl ColumnKind {
    pub const ALL: [ColumnKind; 5] = [
        ColumnKind::Integer,
        ColumnKind::Float,
        ColumnKind::Text,
        ColumnKind::Boolean,
        ColumnKind::Date,
    ];

    /// Integer and floating-point columns only. Booleans and dates are not numeric.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    /// Whether a cell may live in a column of this kind.
    pub fn accepts(self, value: &CellValue) -> bool {
        matches!(
            (self, value),
            (_, CellValue::Null)
                | (ColumnKind::Integer, CellValue::Integer(_))
                | (ColumnKind::Float, CellValue::Float(_))
                | (ColumnKind::Text, CellValue::Text(_))
                | (ColumnKind::Boolean, CellValue::Bool(_))
                | (ColumnKind::Date, CellValue::Date(_))
        )
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Integer => "int64",
            ColumnKind::Float => "float64",
            ColumnKind::Text => "text",
            ColumnKind::Boolean => "bool",
            ColumnKind::Date => "datetime",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// One cell. Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    /// ISO-8601 date or date-time kept as text.
    Date(String),
    Null,
}

// -- Manual Eq/Ord/Hash so we can put CellValue in BTreeSet and HashMap --
//
// All three agree: floats compare by `canonical_float`, so `-0.0` equals
// `0.0` and every NaN equals every other NaN.

fn canonical_float(f: f64) -> f64 {
    if f == 0.0 {
        0.0
    } else if f.is_nan() {
        f64::NAN
    } else {
        f
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => canonical_float(*a).total_cmp(&canonical_float(*b)),
            (Text(a), Text(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) | CellValue::Date(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => canonical_float(*f).to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for numeric computations.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Missing cell (`Null` or a floating-point NaN).
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Column – a named, typed sequence of cells
// ---------------------------------------------------------------------------

/// A single column of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    values: Vec<CellValue>,
}

impl Column {
    /// Build a column, checking that every non-null cell matches `kind`.
    pub fn new(
        name: impl Into<String>,
        kind: ColumnKind,
        values: Vec<CellValue>,
    ) -> Result<Self, DatasetError> {
        let name = name.into();
        if let Some(row) = values.iter().position(|v| !kind.accepts(v)) {
            return Err(DatasetError::KindMismatch {
                column: name,
                kind,
                row,
            });
        }
        Ok(Self { name, kind, values })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of missing cells.
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }

    /// Row-aligned numeric view: `None` for missing or non-numeric cells.
    pub fn numeric_values(&self) -> Vec<Option<f64>> {
        self.values
            .iter()
            .map(|v| v.as_f64().filter(|f| !f.is_nan()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// TabularDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table: ordered columns with a uniform row count.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularDataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl TabularDataset {
    /// Assemble a dataset, enforcing unique names and a uniform row count.
    pub fn new(columns: Vec<Column>) -> Result<Self, DatasetError> {
        let n_rows = columns.first().map_or(0, Column::len);

        let mut seen = BTreeSet::new();
        for col in &columns {
            if !seen.insert(col.name()) {
                return Err(DatasetError::DuplicateColumn(col.name().to_string()));
            }
            if col.len() != n_rows {
                return Err(DatasetError::RaggedColumn {
                    column: col.name().to_string(),
                    expected: n_rows,
                    found: col.len(),
                });
            }
        }

        Ok(Self { columns, n_rows })
    }

    /// A dataset with no columns and no rows.
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            n_rows: 0,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Column names in file order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Borrow the cells of one row, in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&CellValue>> {
        if index >= self.n_rows {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_values_order_by_variant_then_value() {
        let mut values = vec![
            CellValue::Text("b".into()),
            CellValue::Integer(3),
            CellValue::Null,
            CellValue::Float(f64::NAN),
            CellValue::Float(-1.0),
            CellValue::Bool(true),
            CellValue::Text("a".into()),
        ];
        values.sort();
        assert_eq!(values[0], CellValue::Null);
        assert_eq!(values[1], CellValue::Bool(true));
        assert_eq!(values[2], CellValue::Integer(3));
        assert_eq!(values[3], CellValue::Float(-1.0));
        assert!(matches!(values[4], CellValue::Float(v) if v.is_nan()));
        assert_eq!(values[5], CellValue::Text("a".into()));
    }

    #[test]
    fn column_rejects_cells_of_another_kind() {
        let err = Column::new(
            "n",
            ColumnKind::Integer,
            vec![CellValue::Integer(1), CellValue::Text("x".into())],
        )
        .unwrap_err();
        assert_eq!(
            err,
            DatasetError::KindMismatch {
                column: "n".into(),
                kind: ColumnKind::Integer,
                row: 1
            }
        );
    }

    #[test]
    fn null_fits_every_kind() {
        for kind in ColumnKind::ALL {
            assert!(kind.accepts(&CellValue::Null));
        }
    }

    #[test]
    fn dataset_requires_uniform_rows() {
        let a = Column::new("a", ColumnKind::Integer, vec![CellValue::Integer(1)]).unwrap();
        let b = Column::new("b", ColumnKind::Text, vec![]).unwrap();
        assert!(matches!(
            TabularDataset::new(vec![a, b]),
            Err(DatasetError::RaggedColumn { expected: 1, found: 0, .. })
        ));
    }

    #[test]
    fn dataset_rejects_duplicate_names() {
        let a = Column::new("a", ColumnKind::Text, vec![]).unwrap();
        let b = Column::new("a", ColumnKind::Float, vec![]).unwrap();
        assert_eq!(
            TabularDataset::new(vec![a, b]),
            Err(DatasetError::DuplicateColumn("a".into()))
        );
    }

    #[test]
    fn rows_are_read_across_columns() {
        let a = Column::new(
            "a",
            ColumnKind::Integer,
            vec![CellValue::Integer(1), CellValue::Null],
        )
        .unwrap();
        let b = Column::new(
            "b",
            ColumnKind::Boolean,
            vec![CellValue::Bool(false), CellValue::Bool(true)],
        )
        .unwrap();
        let ds = TabularDataset::new(vec![a, b]).unwrap();
        assert_eq!(ds.n_rows(), 2);
        assert_eq!(
            ds.row(1).unwrap(),
            vec![&CellValue::Null, &CellValue::Bool(true)]
        );
        assert!(ds.row(2).is_none());
        assert_eq!(ds.column("a").unwrap().missing_count(), 1);
    }

    #[test]
    fn signed_zero_is_one_value() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let hash = |v: &CellValue| {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        };
        let (pos, neg) = (CellValue::Float(0.0), CellValue::Float(-0.0));
        assert_eq!(pos, neg);
        assert_eq!(pos.cmp(&neg), std::cmp::Ordering::Equal);
        assert_eq!(hash(&pos), hash(&neg));

        let nan = CellValue::Float(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_eq!(hash(&nan), hash(&CellValue::Float(-f64::NAN)));
    }
}
