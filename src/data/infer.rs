use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, ColumnKind};

/// Cell spellings that mean "missing" in delimited text and string cells.
pub const MISSING_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_TOKENS: [&str; 3] = ["true", "True", "TRUE"];
const FALSE_TOKENS: [&str; 3] = ["false", "False", "FALSE"];

pub fn is_missing_token(s: &str) -> bool {
    MISSING_TOKENS.contains(&s)
}

fn parse_bool(s: &str) -> Option<bool> {
    if TRUE_TOKENS.contains(&s) {
        Some(true)
    } else if FALSE_TOKENS.contains(&s) {
        Some(false)
    } else {
        None
    }
}

/// Kind of a column with no present values: float when it has rows (all
/// missing), text when the table has no rows at all.
fn all_missing_kind(n_rows: usize) -> ColumnKind {
    if n_rows == 0 {
        ColumnKind::Text
    } else {
        ColumnKind::Float
    }
}

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

/// Fill blank header cells with `Unnamed: {i}` and de-duplicate repeated
/// names as `name.1`, `name.2`, ...
pub fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut next_suffix: BTreeMap<String, usize> = BTreeMap::new();
    let mut used: BTreeSet<String> = BTreeSet::new();
    let mut names = Vec::with_capacity(raw.len());

    for (i, header) in raw.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            header
        };

        let mut name = base.clone();
        let suffix = next_suffix.entry(base.clone()).or_insert(0);
        while used.contains(&name) {
            *suffix += 1;
            name = format!("{base}.{suffix}");
        }
        used.insert(name.clone());
        names.push(name);
    }
    names
}

// ---------------------------------------------------------------------------
// Delimited text: every cell arrives as a string
// ---------------------------------------------------------------------------

/// Infer a column's kind from raw text cells and convert them.
///
/// Rules over the non-missing cells, first match wins: all `i64` → Integer,
/// all `f64` → Float, all boolean spellings → Boolean, otherwise Text.
/// Missing cells become `Null` and never change the kind.
pub fn infer_text_column(raw: &[&str]) -> (ColumnKind, Vec<CellValue>) {
    let present: Vec<&str> = raw.iter().copied().filter(|s| !is_missing_token(s)).collect();

    if present.is_empty() {
        return (all_missing_kind(raw.len()), vec![CellValue::Null; raw.len()]);
    }

    let convert = |f: &dyn Fn(&str) -> CellValue| -> Vec<CellValue> {
        raw.iter()
            .map(|s| {
                if is_missing_token(s) {
                    CellValue::Null
                } else {
                    f(*s)
                }
            })
            .collect()
    };

    if present.iter().all(|s| s.trim().parse::<i64>().is_ok()) {
        let values = convert(&|s| CellValue::Integer(s.trim().parse().unwrap_or_default()));
        return (ColumnKind::Integer, values);
    }
    if present.iter().all(|s| s.trim().parse::<f64>().is_ok()) {
        let values = convert(&|s| CellValue::Float(s.trim().parse().unwrap_or(f64::NAN)));
        return (ColumnKind::Float, values);
    }
    if present.iter().all(|s| parse_bool(s).is_some()) {
        let values = convert(&|s| CellValue::Bool(parse_bool(s).unwrap_or_default()));
        return (ColumnKind::Boolean, values);
    }
    (ColumnKind::Text, convert(&|s| CellValue::Text(s.to_string())))
}

// ---------------------------------------------------------------------------
// Spreadsheets: cells arrive already typed by the workbook
// ---------------------------------------------------------------------------

/// A spreadsheet cell reduced to the shapes that matter for inference.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Missing,
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(String),
    Text(String),
}

impl RawCell {
    fn integral(&self) -> Option<i64> {
        match self {
            RawCell::Int(i) => Some(*i),
            RawCell::Float(f)
                if f.is_finite()
                    && f.fract() == 0.0
                    && *f >= i64::MIN as f64
                    && *f < i64::MAX as f64 =>
            {
                Some(*f as i64)
            }
            _ => None,
        }
    }

    fn number(&self) -> Option<f64> {
        match self {
            RawCell::Int(i) => Some(*i as f64),
            RawCell::Float(f) => Some(*f),
            _ => None,
        }
    }

    fn display(&self) -> String {
        match self {
            RawCell::Missing => String::new(),
            RawCell::Int(i) => i.to_string(),
            RawCell::Float(f) => f.to_string(),
            RawCell::Bool(b) => b.to_string(),
            RawCell::Date(s) | RawCell::Text(s) => s.clone(),
        }
    }
}

/// Infer a column's kind from typed spreadsheet cells and convert them.
///
/// Integers and integral floats → Integer, any other numbers → Float,
/// all booleans → Boolean, all dates → Date; mixed columns become Text
/// using each cell's display form.
pub fn infer_typed_column(cells: &[RawCell]) -> (ColumnKind, Vec<CellValue>) {
    let present: Vec<&RawCell> = cells.iter().filter(|c| **c != RawCell::Missing).collect();

    if present.is_empty() {
        return (all_missing_kind(cells.len()), vec![CellValue::Null; cells.len()]);
    }

    let convert = |f: &dyn Fn(&RawCell) -> CellValue| -> Vec<CellValue> {
        cells
            .iter()
            .map(|c| match c {
                RawCell::Missing => CellValue::Null,
                other => f(other),
            })
            .collect()
    };

    if present.iter().all(|c| c.integral().is_some()) {
        let values = convert(&|c| c.integral().map_or(CellValue::Null, CellValue::Integer));
        return (ColumnKind::Integer, values);
    }
    if present.iter().all(|c| c.number().is_some()) {
        let values = convert(&|c| c.number().map_or(CellValue::Null, CellValue::Float));
        return (ColumnKind::Float, values);
    }
    if present.iter().all(|c| matches!(c, RawCell::Bool(_))) {
        let values = convert(&|c| match c {
            RawCell::Bool(b) => CellValue::Bool(*b),
            _ => CellValue::Null,
        });
        return (ColumnKind::Boolean, values);
    }
    if present.iter().all(|c| matches!(c, RawCell::Date(_))) {
        let values = convert(&|c| CellValue::Date(c.display()));
        return (ColumnKind::Date, values);
    }
    (ColumnKind::Text, convert(&|c| CellValue::Text(c.display())))
}
