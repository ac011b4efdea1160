use std::fmt;
use std::path::{Path, PathBuf};

use crate::formats::FileProvider;
use crate::model::{DataFile, FileKind, GiftiFile};

use super::{CommandError, Result};

/// The kind of a declared parameter, fixed when the operation builds its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Bool,
    Int,
    Double,
    String,
    /// A string restricted to the listed spellings.
    Choice(&'static [&'static str]),
    File(FileKind),
}

impl ParamKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "Boolean",
            Self::Int => "Integer",
            Self::Double => "Floating Point",
            Self::String => "String",
            Self::Choice(_) => "Choice",
            Self::File(kind) => kind.name(),
        }
    }

    /// Kinds whose values may legitimately start with `-`, such as negative numbers.
    pub fn accepts_dash_literal(self) -> bool {
        matches!(
            self,
            Self::Int | Self::Double | Self::String | Self::Choice(_)
        )
    }

    pub fn is_file(self) -> bool {
        matches!(self, Self::File(_))
    }
}

/// A file-backed value: the path from the command line and, once loaded or produced, its content.
#[derive(Debug, Clone, PartialEq)]
pub struct FileHandle {
    kind: FileKind,
    path: PathBuf,
    loaded: Option<DataFile>,
}

impl FileHandle {
    pub fn new(kind: FileKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            loaded: None,
        }
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Reads the file through `provider` unless it is already loaded.
    pub fn load(&mut self, provider: &dyn FileProvider) -> Result<&DataFile> {
        let file = match self.loaded.take() {
            Some(file) => file,
            None => provider.read(&self.path, self.kind)?,
        };
        Ok(self.loaded.insert(file))
    }

    pub fn loaded(&self) -> Option<&DataFile> {
        self.loaded.as_ref()
    }

    pub fn loaded_mut(&mut self) -> Option<&mut DataFile> {
        self.loaded.as_mut()
    }

    pub fn set(&mut self, file: DataFile) {
        self.loaded = Some(file);
    }

    pub fn write(&self, provider: &dyn FileProvider) -> Result<()> {
        let file = self
            .loaded
            .as_ref()
            .ok_or_else(|| CommandError::OutputNotSet(self.path.display().to_string()))?;
        provider.write(&self.path, file)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    File(FileHandle),
}

impl ParameterValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Boolean",
            Self::Int(_) => "Integer",
            Self::Double(_) => "Floating Point",
            Self::String(_) => "String",
            Self::File(handle) => handle.kind().name(),
        }
    }

    pub fn as_bool(&self, name: &str) -> Result<bool> {
        match self {
            Self::Bool(value) => Ok(*value),
            other => Err(other.mismatch(name, "Boolean")),
        }
    }

    pub fn as_int(&self, name: &str) -> Result<i64> {
        match self {
            Self::Int(value) => Ok(*value),
            other => Err(other.mismatch(name, "Integer")),
        }
    }

    pub fn as_double(&self, name: &str) -> Result<f64> {
        match self {
            Self::Double(value) => Ok(*value),
            other => Err(other.mismatch(name, "Floating Point")),
        }
    }

    pub fn as_str(&self, name: &str) -> Result<&str> {
        match self {
            Self::String(value) => Ok(value),
            other => Err(other.mismatch(name, "String")),
        }
    }

    pub fn as_file(&self, name: &str) -> Result<&FileHandle> {
        match self {
            Self::File(handle) => Ok(handle),
            other => Err(other.mismatch(name, "file")),
        }
    }

    pub fn as_file_mut(&mut self, name: &str) -> Result<&mut FileHandle> {
        match self {
            Self::File(handle) => Ok(handle),
            other => Err(other.mismatch(name, "file")),
        }
    }

    /// The GIFTI content of a loaded file value.
    pub fn as_gifti(&self, name: &str) -> Result<&GiftiFile> {
        self.as_file(name)?
            .loaded()
            .and_then(DataFile::as_gifti)
            .ok_or_else(|| self.mismatch(name, "loaded GIFTI file"))
    }

    fn mismatch(&self, name: &str, expected: &str) -> CommandError {
        CommandError::type_mismatch(name, self.to_string(), expected)
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Int(value) => write!(formatter, "{value}"),
            Self::Double(value) => write!(formatter, "{value}"),
            Self::String(value) => formatter.write_str(value),
            Self::File(handle) => write!(formatter, "{}", handle.path().display()),
        }
    }
}
