//! Core type definitions shared by the scanner, encoder, and uploader.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::paths::thumbnail_path_for;

/// A source image paired with the thumbnail generated from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhotoPaths {
    /// Original image on disk.
    pub source: PathBuf,
    /// Target path of the generated thumbnail.
    pub thumbnail: PathBuf,
}

impl PhotoPaths {
    /// Pair `source` with its conventional thumbnail location.
    pub fn for_source(source: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();
        let thumbnail = thumbnail_path_for(&source).ok_or_else(|| {
            Error::invalid_argument(format!(
                "cannot derive a thumbnail name for {}",
                source.display()
            ))
        })?;
        Ok(Self { source, thumbnail })
    }

    /// Base file name of the source image.
    pub fn source_name(&self) -> Option<&str> {
        file_name(&self.source)
    }

    /// Base file name of the thumbnail.
    pub fn thumbnail_name(&self) -> Option<&str> {
        file_name(&self.thumbnail)
    }
}

impl fmt::Display for PhotoPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.source.display(),
            self.thumbnail.display()
        )
    }
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
