use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::error::LoadError;

// ---------------------------------------------------------------------------
// FileFormat – parser selection by file name
// ---------------------------------------------------------------------------

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xls,
    Xlsx,
}

impl FileFormat {
    /// Extensions offered by the file picker.
    pub const EXTENSIONS: [&str; 3] = ["csv", "xls", "xlsx"];

    /// Case-sensitive suffix match on the file name.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.ends_with(".csv") {
            Some(FileFormat::Csv)
        } else if name.ends_with(".xlsx") {
            Some(FileFormat::Xlsx)
        } else if name.ends_with(".xls") {
            Some(FileFormat::Xls)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// UploadedFile – what the file picker hands to the session
// ---------------------------------------------------------------------------

/// An uploaded file: declared name plus its full content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
    /// Where the file was read from, if it came from disk.
    pub path: Option<PathBuf>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            path: None,
        }
    }

    /// Read a file from disk, using its file name as the declared name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("invalid file name: {}", path.display()))?
            .to_string();
        let bytes =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        Ok(Self {
            name,
            bytes,
            path: Some(path.to_path_buf()),
        })
    }

    /// Upstream format gate: anything but `.csv`, `.xls`, `.xlsx` is rejected.
    pub fn format(&self) -> Result<FileFormat, LoadError> {
        FileFormat::from_name(&self.name).ok_or_else(|| LoadError::UnsupportedFormat {
            name: self.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_match_is_case_sensitive() {
        assert_eq!(FileFormat::from_name("data.csv"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_name("book.xls"), Some(FileFormat::Xls));
        assert_eq!(FileFormat::from_name("book.xlsx"), Some(FileFormat::Xlsx));
        assert_eq!(FileFormat::from_name("DATA.CSV"), None);
        assert_eq!(FileFormat::from_name("csv"), None);
    }

    #[test]
    fn text_files_are_rejected_before_loading() {
        let file = UploadedFile::new("data.txt", b"a,b\n1,2\n".to_vec());
        assert_eq!(
            file.format(),
            Err(LoadError::UnsupportedFormat {
                name: "data.txt".into()
            })
        );
    }
}
