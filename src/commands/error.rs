use crate::formats::FormatError;
use crate::model::ModelError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Command \"{0}\" not found.")]
    UnknownCommand(String),

    #[error("missing required argument <{0}>")]
    MissingArgument(String),

    #[error("invalid value \"{literal}\" for <{name}>, expected {expected}")]
    TypeMismatch {
        name: String,
        literal: String,
        expected: String,
    },

    #[error(
        "Invalid option \"{token}\" while next required argument is <{expected}>, option is either incorrect, or incorrectly placed"
    )]
    MalformedOption { token: String, expected: String },

    #[error("Option \"{0}\" specified more than once")]
    DuplicateOption(String),

    #[error("unexpected argument \"{0}\", option is either incorrect, or incorrectly placed")]
    ExtraArgument(String),

    #[error(transparent)]
    File(#[from] FormatError),

    #[error("operation switch \"{0}\" is registered more than once")]
    RegistrationConflict(String),

    #[error("invalid parameter declaration in {switch}: {message}")]
    InvalidSchema { switch: String, message: String },

    #[error("{0}")]
    Operation(String),

    #[error("{switch}: {source}")]
    Dispatch {
        switch: String,
        source: Box<CommandError>,
    },

    #[error("output <{0}> was never set by the operation")]
    OutputNotSet(String),

    #[error("no parameter or option named \"{0}\" is declared")]
    UndeclaredParameter(String),

    #[error("invalid character in command switch \"{0}\", only ascii is allowed")]
    NonAsciiSwitch(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    pub fn operation(message: impl Into<String>) -> Self {
        Self::Operation(message.into())
    }

    pub(crate) fn type_mismatch(
        name: &str,
        literal: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            name: name.to_string(),
            literal: literal.into(),
            expected: expected.into(),
        }
    }

    /// Errors raised while matching tokens against a parameter declaration.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument(_)
                | Self::TypeMismatch { .. }
                | Self::MalformedOption { .. }
                | Self::DuplicateOption(_)
                | Self::ExtraArgument(_)
        )
    }
}
