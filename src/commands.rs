mod component;
mod cursor;
mod dispatch;
mod error;
pub mod help;
mod params;
mod parser;
mod registry;
mod schema;


pub use component::{OptionGroup, OptionInstance, Parameter, ParameterComponent};
pub use cursor::{TokenCursor, normalize_hyphens};
pub use dispatch::{Dispatcher, Provenance};
pub use error::{CommandError, Result};
pub use params::{FileHandle, ParamKind, ParameterValue};
pub use parser::CommandParser;
pub use registry::OperationRegistry;
pub use schema::{ComponentSpec, OpSchema, Operation, OperationContext, OptionSpec, ParamSpec};
