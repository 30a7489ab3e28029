//! Error type for the conversion pipeline.

use std::io;
use std::path::{Path, PathBuf};

/// Failures that end a conversion run.
///
/// Malformed input lines are never errors; the parsers skip them.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Could not find file - {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
}

impl ConvertError {
    /// Classifies an I/O error raised while reading `path`.
    pub fn from_read(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            ConvertError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConvertError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ConvertError::FileNotFound { .. })
    }
}

/// Reads a whole UTF-8 input file. The handle is closed before returning.
pub fn read_input(path: &Path) -> Result<String, ConvertError> {
    std::fs::read_to_string(path).map_err(|e| ConvertError::from_read(path, e))
}
