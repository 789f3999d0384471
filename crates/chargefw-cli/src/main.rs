mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::commands::Outcome;
use crate::error::{CliError, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref()) {
        eprintln!("❌ Error: {}", e);
        return ExitCode::from(e.exit_code());
    }

    match run_app(cli) {
        Ok(outcome) => {
            info!(?outcome, "Command finished.");
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("❌ Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run_app(cli: Cli) -> Result<Outcome> {
    info!("ChargeFW CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Some(num_threads) = cli.threads {
        info!(
            "Setting Rayon global thread pool to {} threads.",
            num_threads
        );
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }

    match cli.command {
        Commands::Charges(args) => {
            info!("Dispatching to 'charges' command.");
            commands::charges::run(args)
        }
        Commands::Methods => commands::methods::run(),
        Commands::Info(args) => {
            info!("Dispatching to 'info' command.");
            commands::info::run(args)
        }
    }
}
