use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::runtime::{AppError, Result};

/// Maps a `-logging` argument to a level. Legacy level names are accepted in any case.
pub fn parse_level(name: &str) -> Result<LevelFilter> {
    let level = match name.to_ascii_uppercase().as_str() {
        "OFF" => LevelFilter::OFF,
        "ERROR" | "SEVERE" => LevelFilter::ERROR,
        "WARN" | "WARNING" => LevelFilter::WARN,
        "INFO" | "CONFIG" => LevelFilter::INFO,
        "DEBUG" | "FINE" | "FINER" => LevelFilter::DEBUG,
        "TRACE" | "FINEST" | "ALL" => LevelFilter::TRACE,
        _ => return Err(AppError::InvalidLogLevel(name.to_string())),
    };
    Ok(level)
}

/// Installs the stderr subscriber. `RUST_LOG` wins over the level given on the command line.
pub fn init_logging(level: Option<LevelFilter>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(level.unwrap_or(LevelFilter::WARN).into())
    });
    // a subscriber may already be installed when embedded in another process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
