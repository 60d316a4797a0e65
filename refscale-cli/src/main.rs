//! Refscale CLI: the `refscale` command.

mod cli;
mod commands;
mod config;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands};
use refscale::RefscaleError;
use tracing_subscriber::filter::{Directive, EnvFilter};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (result, json) = match cli.command {
        Commands::Scale {
            input,
            scale,
            units,
            units_dir,
            json,
        } => (
            commands::scale::run(commands::scale::Args {
                input,
                scale,
                units,
                units_dir,
                json,
            }),
            json,
        ),

        Commands::Units { units_dir } => (commands::units::run(units_dir), false),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, json);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout carries only results
fn init_logging(verbose: u8) {
    let filter = match (verbose, EnvFilter::try_from_default_env()) {
        (0, Ok(filter)) => filter,
        (_, filter) => {
            let filter = filter.unwrap_or_default();
            match config::log_directive(verbose).parse::<Directive>() {
                Ok(directive) => filter.add_directive(directive),
                Err(_) => filter,
            }
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report_error(err: &RefscaleError, json: bool) {
    if json {
        if let Ok(report) = serde_json::to_string_pretty(&err.report()) {
            eprintln!("{report}");
            return;
        }
    }
    eprintln!("error: {err}");
}
