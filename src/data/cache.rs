use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::error::LoadError;
use super::loader;
use super::model::TabularDataset;
use super::upload::UploadedFile;

/// Result of loading one file, shared between re-renders.
pub type LoadOutcome = Result<Arc<TabularDataset>, LoadError>;

// ---------------------------------------------------------------------------
// FileFingerprint – identity of an upload (name + content)
// ---------------------------------------------------------------------------

/// SHA-256 over the file name and bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileFingerprint([u8; 32]);

impl FileFingerprint {
    pub fn of(name: &str, bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((name.len() as u64).to_le_bytes());
        hasher.update(name.as_bytes());
        hasher.update(bytes);
        Self(hasher.finalize().into())
    }

    pub fn of_file(file: &UploadedFile) -> Self {
        Self::of(&file.name, &file.bytes)
    }
}

impl fmt::Display for FileFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// LoadCache – single-entry memo table owned by the session
// ---------------------------------------------------------------------------

/// Memoizes the most recent load.  A hit returns the stored outcome (dataset
/// or error) without parsing; a different file replaces the entry.
#[derive(Debug, Default)]
pub struct LoadCache {
    entry: Option<(FileFingerprint, LoadOutcome)>,
    parses: usize,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load through the real parser.
    pub fn load(&mut self, file: &UploadedFile) -> LoadOutcome {
        self.load_with(file, loader::load_bytes)
    }

    /// Load through `parse`, which only runs when the fingerprint is new.
    pub fn load_with<F>(&mut self, file: &UploadedFile, parse: F) -> LoadOutcome
    where
        F: FnOnce(&[u8], &str) -> Result<TabularDataset, LoadError>,
    {
        let fingerprint = FileFingerprint::of_file(file);

        if let Some((cached, outcome)) = &self.entry {
            if *cached == fingerprint {
                log::debug!("Load cache hit for {} ({fingerprint})", file.name);
                return outcome.clone();
            }
        }

        log::info!("Parsing {} ({} bytes)", file.name, file.bytes.len());
        self.parses += 1;
        let outcome = parse(&file.bytes, &file.name).map(Arc::new);
        self.entry = Some((fingerprint, outcome.clone()));
        outcome
    }

    /// Fingerprint of the memoized file, if any.
    pub fn fingerprint(&self) -> Option<FileFingerprint> {
        self.entry.as_ref().map(|(fp, _)| *fp)
    }

    /// How many times the parser actually ran.
    pub fn parse_count(&self) -> usize {
        self.parses
    }
}
