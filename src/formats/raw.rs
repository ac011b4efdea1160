use std::fs;
use std::path::Path;

use crate::model::{FileKind, RawFile};

use super::Result;

pub(crate) fn read_raw(path: &Path, kind: FileKind) -> Result<RawFile> {
    let bytes = fs::read(path)?;
    Ok(RawFile { kind, bytes })
}

pub(crate) fn write_raw(path: &Path, file: &RawFile) -> Result<()> {
    fs::write(path, &file.bytes)?;
    Ok(())
}
