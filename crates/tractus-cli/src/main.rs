use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tractus_cli::plan::{self, PlanOptions};
use tractus_cli::{Cli, Config};

fn run(cli: &Cli) -> Result<()> {
    let started = Instant::now();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let options = PlanOptions::resolve(cli, config);
    let records = plan::run(&options).with_context(|| {
        format!(
            "failed to allocate {} into {}",
            options.input.display(),
            options.output.display()
        )
    })?;
    tracing::info!(records, "allocation complete");

    if cli.time {
        println!("{}", started.elapsed().as_secs_f64());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Logs go to stderr so stdout only carries the --time output
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error:#}");
            ExitCode::from(plan::exit_code_for(&error))
        }
    }
}
