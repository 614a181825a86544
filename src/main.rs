use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use quire::cli::{read_input, run, CliArgs};

fn main() -> Result<ExitCode> {
    quire::tracing::init();

    let args = CliArgs::parse();
    let settings = args.settings()?;
    let input = if args.command.reads_input() {
        read_input(args.command.file())?
    } else {
        String::new()
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let clean = run(&args.command, &input, &settings, &mut out)?;

    Ok(if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
