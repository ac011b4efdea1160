use thiserror::Error;

use super::FileKind;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unrecognized {what}: '{value}'")]
    UnknownName { what: &'static str, value: String },

    #[error("value count mismatch: dimensions require {expected} values but {found} were given")]
    ValueCountMismatch { expected: usize, found: usize },

    #[error("invalid data array: {0}")]
    InvalidArray(String),

    #[error("column '{0}' does not exist in file")]
    ColumnNotFound(String),

    #[error("file is not a valid {kind} file: {reason}")]
    KindMismatch { kind: FileKind, reason: String },
}
