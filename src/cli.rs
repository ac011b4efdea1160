mod global;
mod info;
mod logging;
mod runner;


pub use global::GlobalOptions;
pub use logging::{init_logging, parse_level};
pub use runner::{PROGRAM, VERSION, normalize_args, provenance, run, run_cli};
