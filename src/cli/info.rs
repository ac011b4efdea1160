use std::io::Write;
use std::sync::Arc;

use crate::commands::help::{format_text, operation_help};
use crate::commands::{Operation, OperationRegistry};
use crate::runtime::Result;

use super::{PROGRAM, VERSION};

const INFORMATION_SWITCHES: [(&str, &str); 8] = [
    ("-help", "show this help info"),
    ("-arguments-help", "explain the format of subcommand help info"),
    ("-global-options", "display options that can be added to any command"),
    ("-version", "show version information"),
    ("-list-commands", "list all processing subcommands"),
    ("-list-deprecated-commands", "list deprecated subcommands"),
    ("-all-commands-help", "show all processing subcommands and their help info"),
    ("-describe-commands", "print the parameter tree of every subcommand as JSON"),
];

pub(super) fn help_info(registry: &OperationRegistry, out: &mut dyn Write) -> Result<()> {
    version_info(out)?;
    writeln!(out)?;
    writeln!(out, "Information options:")?;
    let width = INFORMATION_SWITCHES
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or_default();
    for (name, description) in INFORMATION_SWITCHES {
        writeln!(out, "   {name:<width$}   {description}")?;
    }
    writeln!(out)?;
    out.write_all(
        format_text(
            "To get the help information of a processing subcommand, run it without any additional arguments.",
            0,
            true,
        )
        .as_bytes(),
    )?;
    writeln!(out)?;
    out.write_all(
        format_text(
            "If the first argument is not recognized, all processing commands that start with the argument are displayed.",
            0,
            true,
        )
        .as_bytes(),
    )?;
    writeln!(out)?;
    writeln!(out, "Processing subcommands:")?;
    command_list(registry.list_all(), out)
}

pub(super) fn arguments_help(out: &mut dyn Write) -> Result<()> {
    let paragraphs = [
        "Each subcommand takes its mandatory parameters in a fixed order, shown as '<name>' in its help info.  \
         Parameters marked 'output' name the files the command writes.  \
         Options are shown as '[-switch]', are followed by their own mandatory parameters, and may have suboptions of their own.",
        "An option may occur anywhere within the scope it belongs to.  \
         Each option opens a new scope, and any argument or option that is not valid in that scope closes it.  \
         Options marked 'repeatable' may be given more than once, and each occurrence is independent.",
    ];
    for paragraph in paragraphs {
        out.write_all(format_text(paragraph, 3, false).as_bytes())?;
        writeln!(out)?;
    }
    writeln!(out, "For example, all of these are accepted:")?;
    writeln!(out)?;
    writeln!(
        out,
        "$ {PROGRAM} -metric-merge out.func.gii -metric a.func.gii -column 1 -up-to 3 -metric b.func.gii"
    )?;
    writeln!(
        out,
        "$ {PROGRAM} -metric-merge -metric a.func.gii -column 1 -up-to 3 out.func.gii"
    )?;
    writeln!(out)?;
    out.write_all(
        format_text(
            "while this one is not, because the output argument ends the scope of -metric before -column is seen:",
            3,
            false,
        )
        .as_bytes(),
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "$ {PROGRAM} -metric-merge -metric a.func.gii out.func.gii -column 1"
    )?;
    Ok(())
}

pub(super) fn global_options(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Global options (can be added to any command):")?;
    writeln!(out)?;
    writeln!(
        out,
        "   -disable-provenance   don't generate provenance info in output files"
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "   -logging <level>      set the logging level, valid values are:"
    )?;
    for level in ["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"] {
        writeln!(out, "                            {level}")?;
    }
    writeln!(out)?;
    out.write_all(
        format_text(
            "The RUST_LOG environment variable, when set, takes precedence over -logging.",
            3,
            true,
        )
        .as_bytes(),
    )?;
    Ok(())
}

pub(super) fn version_info(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{PROGRAM} version {VERSION}")?;
    Ok(())
}

/// Switches and short descriptions, sorted by switch, descriptions aligned.
pub(super) fn command_list(operations: &[Arc<dyn Operation>], out: &mut dyn Write) -> Result<()> {
    let mut sorted = operations.iter().collect::<Vec<_>>();
    sorted.sort_by_key(|operation| operation.switch());
    let width = sorted
        .iter()
        .map(|operation| operation.switch().len())
        .max()
        .unwrap_or_default()
        + 2;
    for operation in sorted {
        writeln!(
            out,
            "{:<width$}{}",
            operation.switch(),
            operation.short_description()
        )?;
    }
    Ok(())
}

pub(super) fn all_commands_help(registry: &OperationRegistry, out: &mut dyn Write) -> Result<()> {
    for operation in registry.list_all() {
        out.write_all(operation_help(operation.as_ref(), PROGRAM).as_bytes())?;
        writeln!(out)?;
    }
    Ok(())
}

pub(super) fn describe_commands(registry: &OperationRegistry, out: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, &registry.schemas())?;
    writeln!(out)?;
    Ok(())
}
