use super::error::EmptyNumericSet;
use super::model::TabularDataset;

/// Column names split by type, in dataset order.
///
/// Derived data only: recompute it whenever the dataset changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnTypePartition {
    /// Integer and floating-point columns.
    pub numeric: Vec<String>,
    /// Every column.
    pub all: Vec<String>,
}

impl ColumnTypePartition {
    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric.iter().any(|c| c == column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.all.iter().any(|c| c == column)
    }

    /// Numeric column names, or [`EmptyNumericSet`] when there are none.
    pub fn require_numeric(&self) -> Result<&[String], EmptyNumericSet> {
        if self.numeric.is_empty() {
            Err(EmptyNumericSet)
        } else {
            Ok(&self.numeric)
        }
    }
}

/// Partition the dataset's columns by their load-time kind.
pub fn classify(dataset: &TabularDataset) -> ColumnTypePartition {
    let mut partition = ColumnTypePartition::default();
    for column in dataset.columns() {
        if column.kind().is_numeric() {
            partition.numeric.push(column.name().to_string());
        }
        partition.all.push(column.name().to_string());
    }
    partition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;

    #[test]
    fn integer_and_text_columns() {
        let ds = load_bytes(b"a,b\n1,x\n2,y\n", "data.csv").unwrap();
        let partition = classify(&ds);
        assert_eq!(partition.numeric, vec!["a"]);
        assert_eq!(partition.all, vec!["a", "b"]);
        assert_eq!(partition.require_numeric(), Ok(&["a".to_string()][..]));
    }

    #[test]
    fn booleans_are_not_numeric() {
        let ds = load_bytes(b"flag,x\ntrue,1.5\nfalse,2\n", "data.csv").unwrap();
        let partition = classify(&ds);
        assert!(!partition.is_numeric("flag"));
        assert!(partition.is_numeric("x"));
        assert!(partition.contains("flag"));
    }

    #[test]
    fn no_numeric_columns_reports_empty_set() {
        let ds = load_bytes(b"name\nann\nbob\n", "data.csv").unwrap();
        let partition = classify(&ds);
        assert!(partition.numeric.is_empty());
        assert_eq!(partition.require_numeric(), Err(EmptyNumericSet));
    }

    #[test]
    fn empty_datasets_classify_cleanly() {
        let partition = classify(&TabularDataset::empty());
        assert!(partition.all.is_empty());
        assert!(partition.numeric.is_empty());

        let header_only = load_bytes(b"a,b\n", "data.csv").unwrap();
        let partition = classify(&header_only);
        assert_eq!(partition.all, vec!["a", "b"]);
        assert!(partition.numeric.is_empty());
    }
}
