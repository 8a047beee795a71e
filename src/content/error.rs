//! Error types for loading content

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::frontmatter::FrontMatterError;

/// Errors raised while reading or parsing posts
#[derive(Error, Debug)]
pub enum ContentError {
    /// Reading a file or directory failed
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Walking the content directory failed
    #[error("failed to scan {path:?}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The front-matter block could not be parsed
    #[error("malformed front matter in {path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    /// A field every post needs is absent
    #[error("missing required field '{field}' in {path:?}")]
    MissingField { field: &'static str, path: PathBuf },

    /// The `date` field is not a recognised date
    #[error("invalid date '{value}' in {path:?}")]
    InvalidDate { value: String, path: PathBuf },
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error belongs to a single document's contents rather
    /// than to the filesystem
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::FrontMatter { .. } | Self::MissingField { .. } | Self::InvalidDate { .. }
        )
    }
}
