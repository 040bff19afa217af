//! Views computed from a loaded dataset: overview, descriptive statistics,
//! correlation and chart data.  Everything here is a pure function of a
//! [`TabularDataset`](crate::data::TabularDataset).

pub mod chart;
pub mod correlation;
pub mod summary;

pub use chart::{build_chart, Chart, ChartData, ChartError, ChartKind, ChartSelection};
pub use correlation::{correlation, CorrelationMatrix};
pub use summary::{describe, head, overview, DatasetOverview, Statistic, StatsError, SummaryTable};
