//! portpool command-line entry point.

use anyhow::Context;
use clap::Parser;
use portpool::cli::{self, Args};
use portpool::{logging, output};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init_logging(logging::level_for(args.verbose, args.quiet));

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    cli::execute(args).with_context(|| format!("scan of {} failed", args.target))?;
    Ok(())
}
