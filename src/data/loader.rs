use std::io::{Cursor, Read};

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto_from_rs, Data, DataType, Range, Reader};
use chrono::{NaiveDateTime, Timelike};

use super::error::LoadError;
use super::infer::{infer_text_column, infer_typed_column, is_missing_token, normalize_headers, RawCell};
use super::model::{Column, TabularDataset};
use super::upload::FileFormat;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset from a byte stream.  Dispatch by the declared file name.
///
/// Supported formats:
/// * `.csv`          – delimited text, first row is the header
/// * `.xls` / `.xlsx` – first worksheet, first row is the header
///
/// Every failure is returned as [`LoadError`]; nothing panics past this call.
pub fn load<R: Read>(mut reader: R, file_name: &str) -> Result<TabularDataset, LoadError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .with_context(|| format!("reading {file_name}"))
        .map_err(|e| LoadError::parse(&e))?;
    load_bytes(&bytes, file_name)
}

/// Same as [`load`] for content already in memory.
pub fn load_bytes(bytes: &[u8], file_name: &str) -> Result<TabularDataset, LoadError> {
    let format = FileFormat::from_name(file_name).ok_or_else(|| LoadError::UnsupportedFormat {
        name: file_name.to_string(),
    })?;

    let parsed = match format {
        FileFormat::Csv => load_csv(bytes),
        FileFormat::Xls | FileFormat::Xlsx => load_spreadsheet(bytes),
    };

    match parsed {
        Ok(dataset) => {
            log::debug!(
                "Parsed {file_name}: {} rows x {} columns",
                dataset.n_rows(),
                dataset.n_columns()
            );
            Ok(dataset)
        }
        Err(e) => {
            log::error!("Failed to parse {file_name}: {e:#}");
            Err(LoadError::parse(&e))
        }
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line.
/// The csv reader drops empty lines itself, so a quoted `""` still counts
/// as a row. Short records are padded with missing cells.
fn load_csv(bytes: &[u8]) -> Result<TabularDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let raw_headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if raw_headers.iter().all(|h| h.is_empty()) && raw_headers.len() <= 1 {
        bail!("No columns to parse from file");
    }

    let headers = normalize_headers(raw_headers);
    let width = headers.len();
    let mut cells: Vec<Vec<String>> = vec![Vec::new(); width];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        if record.len() > width {
            let line = record.position().map_or(row_no as u64 + 2, |p| p.line());
            bail!(
                "Expected {width} fields in line {line}, saw {}",
                record.len()
            );
        }

        for (col_idx, column) in cells.iter_mut().enumerate() {
            column.push(record.get(col_idx).unwrap_or("").to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| {
            let refs: Vec<&str> = raw.iter().map(String::as_str).collect();
            let (kind, values) = infer_text_column(&refs);
            Column::new(name, kind, values)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TabularDataset::new(columns)?)
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// Load the first worksheet of an `.xls` / `.xlsx` workbook.
///
/// The container format is sniffed from the content, so a workbook saved
/// with the "wrong" one of the two extensions still opens.
fn load_spreadsheet(bytes: &[u8]) -> Result<TabularDataset> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).context("opening workbook")?;

    let range = workbook
        .worksheet_range_at(0)
        .context("workbook contains no worksheets")?
        .context("reading first worksheet")?;

    dataset_from_range(&range)
}

/// Convert a worksheet range (header row + data rows) into a dataset.
pub(crate) fn dataset_from_range(range: &Range<Data>) -> Result<TabularDataset> {
    let mut rows = range.rows();

    let Some(header_row) = rows.next() else {
        return Ok(TabularDataset::empty());
    };

    let headers = normalize_headers(header_row.iter().map(header_text).collect());
    let mut cells: Vec<Vec<RawCell>> = vec![Vec::new(); headers.len()];

    for row in rows {
        for (col_idx, column) in cells.iter_mut().enumerate() {
            column.push(row.get(col_idx).map_or(RawCell::Missing, raw_cell));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| {
            let (kind, values) = infer_typed_column(&raw);
            Column::new(name, kind, values)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TabularDataset::new(columns)?)
}

// -- Spreadsheet helpers --

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.is_finite() => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

fn raw_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty | Data::Error(_) => RawCell::Missing,
        Data::Int(i) => RawCell::Int(*i),
        Data::Float(f) => RawCell::Float(*f),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::String(s) if is_missing_token(s) => RawCell::Missing,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::DateTimeIso(s) => RawCell::Date(s.clone()),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) => RawCell::Date(format_datetime(dt)),
            None => RawCell::Text(cell.to_string()),
        },
        other => RawCell::Text(other.to_string()),
    }
}

/// `YYYY-MM-DD` for midnight, `YYYY-MM-DD HH:MM:SS` otherwise.
fn format_datetime(dt: NaiveDateTime) -> String {
    if dt.num_seconds_from_midnight() == 0 {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, ColumnKind};

    fn load_csv_str(text: &str) -> Result<TabularDataset, LoadError> {
        load_bytes(text.as_bytes(), "data.csv")
    }

    #[test]
    fn small_csv_is_typed_per_column() {
        let ds = load_csv_str("a,b\n1,x\n2,y\n").unwrap();
        assert_eq!(ds.column_names(), vec!["a", "b"]);
        assert_eq!(ds.n_rows(), 2);
        assert_eq!(ds.column("a").unwrap().kind(), ColumnKind::Integer);
        assert_eq!(ds.column("b").unwrap().kind(), ColumnKind::Text);
    }

    #[test]
    fn load_reads_from_any_reader() {
        let ds = load(Cursor::new(b"x;y\n".to_vec()), "one.csv").unwrap();
        assert_eq!(ds.column_names(), vec!["x;y"]);
        assert!(ds.is_empty());
        assert_eq!(ds.columns()[0].kind(), ColumnKind::Text);
    }

    #[test]
    fn empty_csv_is_a_parse_failure() {
        let err = load_csv_str("").unwrap_err();
        assert_eq!(
            err,
            LoadError::ParseFailure {
                message: "No columns to parse from file".into()
            }
        );
    }

    #[test]
    fn short_rows_are_padded_and_blank_lines_skipped() {
        let ds = load_csv_str("a,b,c\n1,2\n\n3,4,5\n").unwrap();
        assert_eq!(ds.n_rows(), 2);
        let c = ds.column("c").unwrap();
        assert_eq!(c.values(), &[CellValue::Null, CellValue::Integer(5)]);
    }

    #[test]
    fn quoted_empty_cell_is_a_row() {
        let ds = load_csv_str("a\n1\n\"\"\n3\n").unwrap();
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(
            ds.column("a").unwrap().values(),
            &[CellValue::Integer(1), CellValue::Null, CellValue::Integer(3)]
        );

        let ds = load_csv_str("a\r\n1\r\n\r\n\"\"\r\n").unwrap();
        assert_eq!(ds.n_rows(), 2);
    }

    #[test]
    fn long_rows_are_rejected_with_line_number() {
        let err = load_csv_str("a,b\n1,2\n3,4,5\n").unwrap_err();
        match err {
            LoadError::ParseFailure { message } => {
                assert_eq!(message, "Expected 2 fields in line 3, saw 3")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_is_a_parse_failure() {
        let err = load_bytes(b"a\n\xff\xfe\n", "bad.csv").unwrap_err();
        assert!(matches!(err, LoadError::ParseFailure { .. }));
    }

    #[test]
    fn duplicate_headers_are_renamed() {
        let ds = load_csv_str("v,v,\n1,2,3\n").unwrap();
        assert_eq!(ds.column_names(), vec!["v", "v.1", "Unnamed: 2"]);
    }

    #[test]
    fn truncated_spreadsheet_is_a_parse_failure() {
        let bytes = b"PK\x03\x04\x14\x00\x06\x00\x08\x00\x00\x00!\x00";
        let err = load_bytes(bytes, "book.xlsx").unwrap_err();
        assert!(matches!(err, LoadError::ParseFailure { .. }));

        let err = load_bytes(&[], "book.xls").unwrap_err();
        assert!(matches!(err, LoadError::ParseFailure { .. }));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = load_bytes(b"a\n1\n", "data.txt").unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
    }

    #[test]
    fn worksheet_range_becomes_typed_columns() {
        let mut range: Range<Data> = Range::new((0, 0), (3, 3));
        range.set_value((0, 0), Data::String("id".into()));
        range.set_value((0, 1), Data::String("score".into()));
        range.set_value((0, 2), Data::String("passed".into()));
        range.set_value((0, 3), Data::Float(2024.0));
        for (r, (score, passed)) in [(1.5, true), (2.0, false), (3.25, true)]
            .into_iter()
            .enumerate()
        {
            let row = r as u32 + 1;
            range.set_value((row, 0), Data::Float(row as f64));
            range.set_value((row, 1), Data::Float(score));
            range.set_value((row, 2), Data::Bool(passed));
            range.set_value((row, 3), Data::String("NA".into()));
        }

        let ds = dataset_from_range(&range).unwrap();
        assert_eq!(ds.column_names(), vec!["id", "score", "passed", "2024"]);
        assert_eq!(ds.n_rows(), 3);
        let kinds: Vec<ColumnKind> = ds.columns().iter().map(Column::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Integer,
                ColumnKind::Float,
                ColumnKind::Boolean,
                ColumnKind::Float
            ]
        );
        assert_eq!(ds.column("2024").unwrap().missing_count(), 3);
    }

    #[test]
    fn empty_worksheet_is_an_empty_dataset() {
        let range: Range<Data> = Range::empty();
        let ds = dataset_from_range(&range).unwrap();
        assert_eq!(ds.n_columns(), 0);
        assert_eq!(ds.n_rows(), 0);
    }

    #[test]
    fn midnight_dates_drop_the_time() {
        let dt = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        assert_eq!(format_datetime(dt), "2024-03-01");
        let dt = dt.with_hour(13).unwrap();
        assert_eq!(format_datetime(dt), "2024-03-01 13:00:00");
    }
}
