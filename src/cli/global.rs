use tracing::info;
use tracing_subscriber::filter::LevelFilter;

use crate::commands::TokenCursor;
use crate::runtime::{AppError, Result};

use super::parse_level;

const LOGGING: &str = "-logging";
const DISABLE_PROVENANCE: &str = "-disable-provenance";

/// Options accepted anywhere on the command line, ahead of any command parsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalOptions {
    pub logging: Option<LevelFilter>,
    pub disable_provenance: bool,
    repeated: Vec<&'static str>,
}

impl GlobalOptions {
    /// Removes every global option from `cursor` and leaves it rewound.
    pub fn extract(cursor: &mut TokenCursor) -> Result<Self> {
        let mut options = Self::default();
        cursor.rewind();
        while let Some(token) = cursor.peek() {
            match token {
                LOGGING => {
                    cursor.remove();
                    let name = cursor
                        .remove()
                        .ok_or_else(|| AppError::MissingGlobalArgument {
                            option: LOGGING.to_string(),
                        })?;
                    if options.logging.replace(parse_level(&name)?).is_some() {
                        options.repeated.push(LOGGING);
                    }
                }
                DISABLE_PROVENANCE => {
                    cursor.remove();
                    if options.disable_provenance {
                        options.repeated.push(DISABLE_PROVENANCE);
                    }
                    options.disable_provenance = true;
                }
                _ => cursor.advance(),
            }
        }
        cursor.rewind();
        Ok(options)
    }

    /// Call once logging is up; repeats are only reported, the last value stands.
    pub fn report_repeats(&self) {
        for option in &self.repeated {
            info!(option, "global option specified more than once, using the last value");
        }
    }
}
