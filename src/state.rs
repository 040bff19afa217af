use std::path::Path;
use std::sync::Arc;

use crate::analysis::chart::{ChartKind, ChartSelection};
use crate::analysis::summary::{describe, StatsError, SummaryTable};
use crate::data::cache::{FileFingerprint, LoadCache};
use crate::data::classify::{classify, ColumnTypePartition};
use crate::data::error::LoadError;
use crate::data::model::TabularDataset;
use crate::data::upload::UploadedFile;
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Dataset status as seen by the views
// ---------------------------------------------------------------------------

/// What the central panel should show.
#[derive(Debug, Clone, Copy)]
pub enum DatasetStatus<'a> {
    /// Nothing uploaded yet.
    NoFile,
    Loaded(&'a TabularDataset),
    /// The last upload failed; an earlier dataset may still be on screen.
    Failed {
        error: &'a LoadError,
        previous: Option<&'a TabularDataset>,
    },
}

/// Which dataset and toggle a memoized summary table was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SummaryKey {
    dataset: FileFingerprint,
    include_all: bool,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Debug, Default)]
pub struct AppState {
    pub settings: Settings,

    /// Memo table for the loader, replaced on every new upload.
    cache: LoadCache,

    /// Loaded dataset (None until a file loads successfully).
    dataset: Option<Arc<TabularDataset>>,

    /// Fingerprint of the file behind `dataset`.
    dataset_fingerprint: Option<FileFingerprint>,

    /// Last summary table, rebuilt only when its key changes.
    summary: Option<(SummaryKey, Result<SummaryTable, StatsError>)>,
    summary_builds: usize,

    /// Error from the most recent upload, if it failed.
    last_error: Option<LoadError>,

    /// Name of the file behind `dataset`.
    pub file_name: Option<String>,

    /// Last uploaded file, kept for "Reload".
    last_upload: Option<UploadedFile>,

    /// Active chart and its columns.
    pub chart: ChartSelection,

    /// "Show all columns" in the summary statistics.
    pub show_all_stats: bool,

    /// "Show Full Dataset" toggle.
    pub show_raw: bool,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Ingest an uploaded file.  Unsupported names never reach the loader;
    /// a failed parse keeps whatever dataset was loaded before.
    pub fn upload(&mut self, file: UploadedFile) {
        if let Err(e) = file.format() {
            log::warn!("Rejected upload: {e}");
            self.last_error = Some(e);
            return;
        }

        match self.cache.load(&file) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} with {} rows and columns {:?}",
                    file.name,
                    dataset.n_rows(),
                    dataset.column_names()
                );
                let fingerprint = self
                    .cache
                    .fingerprint()
                    .unwrap_or_else(|| FileFingerprint::of_file(&file));
                self.set_dataset(dataset, fingerprint, file.name.clone());
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", file.name);
                self.last_error = Some(e);
            }
        }
        self.last_upload = Some(file);
    }

    /// Read a file from disk and upload it.
    pub fn open_path(&mut self, path: &Path) {
        match UploadedFile::from_path(path) {
            Ok(file) => self.upload(file),
            Err(e) => {
                log::error!("Failed to read {}: {e:#}", path.display());
                self.last_error = Some(LoadError::ParseFailure {
                    message: format!("{e:#}"),
                });
            }
        }
    }

    /// Re-read the last uploaded file from disk.  An unchanged file is served
    /// from the cache without parsing.
    pub fn reload(&mut self) {
        if let Some(path) = self.last_upload.as_ref().and_then(|f| f.path.clone()) {
            self.open_path(&path);
        }
    }

    /// Install a new dataset and point the chart at valid columns.
    fn set_dataset(
        &mut self,
        dataset: Arc<TabularDataset>,
        fingerprint: FileFingerprint,
        file_name: String,
    ) {
        let partition = classify(&dataset);
        self.chart.normalize(&partition);
        self.dataset = Some(dataset);
        self.dataset_fingerprint = Some(fingerprint);
        self.file_name = Some(file_name);
        self.last_error = None;
    }

    pub fn dataset(&self) -> Option<&TabularDataset> {
        self.dataset.as_deref()
    }

    pub fn last_error(&self) -> Option<&LoadError> {
        self.last_error.as_ref()
    }

    pub fn status(&self) -> DatasetStatus<'_> {
        match (&self.last_error, self.dataset()) {
            (Some(error), previous) => DatasetStatus::Failed { error, previous },
            (None, Some(dataset)) => DatasetStatus::Loaded(dataset),
            (None, None) => DatasetStatus::NoFile,
        }
    }

    /// Descriptive statistics of the current dataset for the "Show all
    /// columns" toggle, computed once per dataset and toggle value.
    pub fn summary(&mut self) -> Option<&Result<SummaryTable, StatsError>> {
        let dataset = self.dataset.as_deref()?;
        let key = SummaryKey {
            dataset: self.dataset_fingerprint?,
            include_all: self.show_all_stats,
        };

        if self.summary.as_ref().map_or(true, |(cached, _)| *cached != key) {
            log::debug!("Building summary table (include_all = {})", key.include_all);
            self.summary = Some((key, describe(dataset, key.include_all)));
            self.summary_builds += 1;
        }
        self.summary.as_ref().map(|(_, table)| table)
    }

    /// Column partition of the current dataset (empty without one).
    pub fn partition(&self) -> ColumnTypePartition {
        self.dataset().map(classify).unwrap_or_default()
    }

    pub fn cache(&self) -> &LoadCache {
        &self.cache
    }

    /// Switch chart type, keeping column choices that are still valid.
    pub fn set_chart_kind(&mut self, kind: ChartKind) {
        let partition = self.partition();
        self.chart.set_kind(kind, &partition);
    }

    pub fn set_chart_x(&mut self, column: String) {
        self.chart.x = Some(column);
    }

    pub fn set_chart_y(&mut self, column: String) {
        self.chart.y = Some(column);
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }
}
