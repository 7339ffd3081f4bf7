use anyhow::Result;
use clap::Parser;
use depdice_core::manager::CommandSource;
use depdice_core::{DepdiceConfig, console, operations};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::env;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod report;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    if let Err(error) = init_tracing(args.verbose) {
        console::error(&error.to_string());
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            console::error(&format!("{:#}", error));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> Result<()> {
    let root = match args.dir {
        Some(dir) => dir,
        None => env::current_dir()?,
    };

    let mut config = DepdiceConfig::from_env();
    if let Some(seconds) = args.timeout {
        config = config.with_timeout_secs(seconds);
    }

    debug!(
        "project root {}, seed {:?}, timeout {:?}",
        root.display(),
        args.seed,
        config.command_timeout
    );

    let connect = |manager| CommandSource::new(config, manager, &root);
    let pick = match args.seed {
        Some(seed) => operations::pick(&root, connect, &mut StdRng::seed_from_u64(seed)).await?,
        None => operations::pick(&root, connect, &mut rand::rng()).await?,
    };

    report::intro();
    report::print_pick(&pick);

    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}
