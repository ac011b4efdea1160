use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::model::{DataFile, FileKind};

use super::{FormatError, Result, read_data_file, write_data_file};

/// Loads and stores the file-backed parameter values of a command.
pub trait FileProvider: Send + Sync {
    fn read(&self, path: &Path, kind: FileKind) -> Result<DataFile>;
    fn write(&self, path: &Path, file: &DataFile) -> Result<()>;
}

impl<P: FileProvider + ?Sized> FileProvider for Arc<P> {
    fn read(&self, path: &Path, kind: FileKind) -> Result<DataFile> {
        (**self).read(path, kind)
    }

    fn write(&self, path: &Path, file: &DataFile) -> Result<()> {
        (**self).write(path, file)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFileProvider;

impl FileProvider for DiskFileProvider {
    fn read(&self, path: &Path, kind: FileKind) -> Result<DataFile> {
        read_data_file(path, kind)
    }

    fn write(&self, path: &Path, file: &DataFile) -> Result<()> {
        write_data_file(path, file)
    }
}

/// Keeps files in memory, keyed by path. Used by tests in place of the disk.
#[derive(Debug, Default)]
pub struct MemoryFileProvider {
    files: Mutex<HashMap<PathBuf, DataFile>>,
    reads: Mutex<Vec<PathBuf>>,
}

impl MemoryFileProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, file: impl Into<DataFile>) {
        self.files().insert(path.into(), file.into());
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<DataFile> {
        self.files().get(path.as_ref()).cloned()
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.files().contains_key(path.as_ref())
    }

    /// Paths passed to `read`, in call order.
    pub fn reads(&self) -> Vec<PathBuf> {
        self.reads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn files(&self) -> MutexGuard<'_, HashMap<PathBuf, DataFile>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FileProvider for MemoryFileProvider {
    fn read(&self, path: &Path, kind: FileKind) -> Result<DataFile> {
        self.reads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_path_buf());
        let file = self
            .files()
            .get(path)
            .cloned()
            .ok_or_else(|| FormatError::FileNotFound {
                path: path.to_path_buf(),
            })?;
        if let DataFile::Gifti(gifti) = &file {
            gifti
                .validate_kind(kind)
                .map_err(|error| FormatError::read_failure(path, kind, error.into()))?;
        }
        Ok(file)
    }

    fn write(&self, path: &Path, file: &DataFile) -> Result<()> {
        self.files().insert(path.to_path_buf(), file.clone());
        Ok(())
    }
}
