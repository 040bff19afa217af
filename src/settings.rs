use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Settings – optional JSON file passed on the command line
// ---------------------------------------------------------------------------

/// Display settings.  Missing keys take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rows shown in the dataset preview.
    pub preview_rows: usize,
    /// Fixed histogram bin count; `None` picks one from the data (Sturges).
    pub histogram_bins: Option<usize>,
    /// Decimals printed inside heatmap cells.
    pub heatmap_decimals: usize,
    /// Initial window size in points.
    pub window_size: [f32; 2],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            histogram_bins: None,
            heatmap_decimals: 2,
            window_size: [1200.0, 800.0],
        }
    }
}

impl Settings {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing settings JSON")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Settings from `path` if given; a bad file logs a warning and falls back
    /// to the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::from_path(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings: {e:#}");
                Self::default()
            }
        }
    }
}
