use std::io::{self, Write};
use std::process::ExitCode;

use tracing::{debug, warn};

use crate::commands::help::operation_help;
use crate::commands::{CommandError, Provenance, TokenCursor, normalize_hyphens};
use crate::runtime::{AppContext, AppError, Result};

use super::{GlobalOptions, info, init_logging};

/// Fixed so help text never shows a path or a wrapper script.
pub const PROGRAM: &str = "wb_command";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process entry point: parses `std::env::args`, runs one command and reports any error on stderr.
pub fn run_cli() -> ExitCode {
    let raw = std::env::args().collect::<Vec<_>>();
    let mut cursor = TokenCursor::new(raw.iter().skip(1).cloned());
    let globals = match GlobalOptions::extract(&mut cursor) {
        Ok(globals) => globals,
        Err(error) => {
            eprintln!("error: {error}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(globals.logging);
    globals.report_repeats();

    let app = match AppContext::new() {
        Ok(app) => app,
        Err(error) => {
            eprintln!("error: {error}");
            return ExitCode::FAILURE;
        }
    };
    let provenance = (!globals.disable_provenance).then(|| provenance(&raw));
    let args = normalize_args(cursor.tokens().to_vec());
    let result = run(&app, args.clone(), provenance, &mut io::stdout().lock());
    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report(&app, &error, args.first().map(String::as_str));
            ExitCode::FAILURE
        }
    };
    app.shutdown();
    code
}

/// One error line, followed by the command's usage when its arguments failed to parse.
fn report(app: &AppContext, error: &AppError, switch: Option<&str>) {
    eprintln!("error: {error}");
    if !error.parse_failure() {
        return;
    }
    let operation = switch.and_then(|switch| app.registry().resolve(switch).ok());
    if let Some(operation) = operation {
        eprintln!();
        eprint!("{}", operation_help(operation.as_ref(), PROGRAM));
    }
}

/// Provenance for this invocation, built from the full command line.
pub fn provenance(raw: &[String]) -> Provenance {
    let working_directory = std::env::current_dir()
        .map(|path| path.display().to_string())
        .unwrap_or_default();
    Provenance {
        command_line: raw.join(" "),
        program: format!("{PROGRAM} {VERSION}"),
        working_directory,
    }
}

/// Replaces look-alike dash characters so pasted command lines still dispatch.
pub fn normalize_args(args: Vec<String>) -> Vec<String> {
    args.into_iter()
        .map(|token| match normalize_hyphens(&token) {
            Some(fixed) => {
                warn!(%token, replacement = %fixed, "replaced non-ascii hyphen characters");
                fixed
            }
            None => token,
        })
        .collect()
}

/// Runs the command named by the first token, or answers an information switch.
///
/// Global options must already be removed from `args`.
pub fn run(
    app: &AppContext,
    args: Vec<String>,
    provenance: Option<Provenance>,
    out: &mut dyn Write,
) -> Result<()> {
    let args = normalize_args(args);
    let Some((switch, rest)) = args.split_first() else {
        return info::help_info(app.registry(), out);
    };
    if !switch.is_ascii() {
        return Err(CommandError::NonAsciiSwitch(switch.clone()).into());
    }

    let registry = app.registry();
    match switch.as_str() {
        "-help" => info::help_info(registry, out),
        "-arguments-help" => info::arguments_help(out),
        "-global-options" => info::global_options(out),
        "-version" => info::version_info(out),
        "-list-commands" => info::command_list(registry.list_all(), out),
        "-list-deprecated-commands" => info::command_list(registry.list_deprecated(), out),
        "-all-commands-help" => info::all_commands_help(registry, out),
        "-describe-commands" => info::describe_commands(registry, out),
        _ => match registry.resolve(switch) {
            Ok(operation) if rest.is_empty() && operation.takes_parameters() => {
                out.write_all(operation_help(operation.as_ref(), PROGRAM).as_bytes())?;
                Ok(())
            }
            Ok(_) => {
                if registry.is_deprecated(switch) {
                    warn!(%switch, "command is deprecated and may be removed in a future release");
                }
                app.execute(switch, rest.to_vec(), provenance, out)
            }
            Err(error) if rest.is_empty() => {
                let matches = registry.matching(switch);
                if matches.is_empty() {
                    return Err(error.into());
                }
                debug!(prefix = %switch, count = matches.len(), "listing commands by prefix");
                info::command_list(&matches, out)
            }
            Err(error) => Err(error.into()),
        },
    }
}
