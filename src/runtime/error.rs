use crate::commands::CommandError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("global option '{option}' requires an argument")]
    MissingGlobalArgument { option: String },

    #[error("unrecognized logging level '{0}'")]
    InvalidLogLevel(String),

    #[error("could not write to standard output: {0}")]
    Output(#[from] std::io::Error),

    #[error("could not serialize command schemas: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// True when the error came out of a command's argument parser.
    pub fn parse_failure(&self) -> bool {
        matches!(self, Self::Command(error) if error.is_parse_error())
    }
}
