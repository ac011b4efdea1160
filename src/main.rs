use std::process::ExitCode;

fn main() -> ExitCode {
    wb_command::run_cli()
}
