use std::path::{Path, PathBuf};

use crate::model::{FileKind, ModelError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FormatError>;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("file does not exist: '{}'", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("error reading {kind} file '{}': {message}", .path.display())]
    FileFormat {
        path: PathBuf,
        kind: FileKind,
        message: String,
    },

    #[error("error writing file '{}': {message}", .path.display())]
    FileWrite { path: PathBuf, message: String },

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse failure: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("XML write failure: {0}")]
    XmlWrite(#[from] quick_xml::Error),

    #[error("base64 decode failure: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("malformed GIFTI content: {0}")]
    Malformed(String),

    #[error("data model failure: {0}")]
    Model(#[from] ModelError),
}

impl FormatError {
    pub(crate) fn read_failure(path: &Path, kind: FileKind, error: FormatError) -> Self {
        match error {
            Self::FileNotFound { .. } | Self::FileFormat { .. } => error,
            other => Self::FileFormat {
                path: path.to_path_buf(),
                kind,
                message: other.to_string(),
            },
        }
    }

    pub(crate) fn write_failure(path: &Path, error: FormatError) -> Self {
        match error {
            Self::FileWrite { .. } => error,
            other => Self::FileWrite {
                path: path.to_path_buf(),
                message: other.to_string(),
            },
        }
    }
}
