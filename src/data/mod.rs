/// Data layer: core types, loading, memoization, and column classification.
///
/// Architecture:
/// ```text
///  .csv / .xls / .xlsx
///        │
///        ▼
///   ┌──────────┐
///   │  upload   │  name + bytes, extension check
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  fingerprint → previous outcome (parse once per file)
///   └──────────┘
///        │ miss
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TabularDataset (infer per column)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ TabularDataset│  Vec<Column>, one ColumnKind each
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ classify  │  numeric / all column names
///   └──────────┘
/// ```

pub mod cache;
pub mod classify;
pub mod error;
pub mod infer;
pub mod loader;
pub mod model;
pub mod upload;

pub use cache::{FileFingerprint, LoadCache, LoadOutcome};
pub use classify::{classify, ColumnTypePartition};
pub use error::{DatasetError, EmptyNumericSet, LoadError};
pub use loader::{load, load_bytes};
pub use model::{CellValue, Column, ColumnKind, TabularDataset};
pub use upload::{FileFormat, UploadedFile};
