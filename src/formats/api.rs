use std::path::Path;

use tracing::debug;

use crate::model::{DataFile, FileKind};

use super::gifti::{read_gifti, write_gifti};
use super::raw::{read_raw, write_raw};
use super::{FormatError, Result};

/// Reads `path` as a file of `kind`, validating GIFTI-backed kinds against their layout.
pub fn read_data_file(path: impl AsRef<Path>, kind: FileKind) -> Result<DataFile> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FormatError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), %kind, "reading data file");
    let loaded = if kind.is_gifti() {
        read_gifti(path).and_then(|file| {
            file.validate_kind(kind)?;
            Ok(DataFile::Gifti(file))
        })
    } else {
        read_raw(path, kind).map(DataFile::Raw)
    };
    loaded.map_err(|error| FormatError::read_failure(path, kind, error))
}

pub fn write_data_file(path: impl AsRef<Path>, file: &DataFile) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), "writing data file");
    let written = match file {
        DataFile::Gifti(gifti) => write_gifti(path, gifti),
        DataFile::Raw(raw) => write_raw(path, raw),
    };
    written.map_err(|error| FormatError::write_failure(path, error))
}
