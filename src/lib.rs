pub mod cli;
pub mod commands;
pub mod formats;
pub mod model;
pub mod operations;
pub mod runtime;

pub use cli::run_cli;
