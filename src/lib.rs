//! Tabular dataset explorer: load a CSV / XLS / XLSX file, classify its
//! columns and render summaries, charts and a correlation heatmap.

pub mod analysis;
pub mod app;
pub mod color;
pub mod data;
pub mod settings;
pub mod state;
pub mod ui;
