mod commands;
mod logging;
mod progress_bar;
mod prompt;

use std::process;
use std::time::Duration;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use progress_bar::CliReporter;
use seedkeeper::config::{self, AppConfig, Overrides};
use seedkeeper::{RadarrClient, ReconcileEngine};
use tracing::{error, info, warn};

fn main() {
    dotenv().ok();

    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            process::exit(code);
        }
    };

    let _guard = logging::init_logger();

    let overrides = Overrides {
        root_directory: args.directory.clone(),
        batch_size: args.replace,
        unattended: args.force.then_some(true),
        record_path: args.record.clone(),
    };
    let loaded = match args.command {
        Some(Commands::PrintConfig) => config::load_unchecked(&overrides),
        None => config::load_configuration(&overrides),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    match args.command {
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config.redacted());
        }
        None => {
            if let Err(err) = run_reconcile(&config) {
                error!("Error: {:#}", err);
                process::exit(1);
            }
        }
    }
}

fn run_reconcile(config: &AppConfig) -> anyhow::Result<()> {
    let catalog = RadarrClient::new(
        &config.remote_base_url,
        &config.remote_api_key,
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("Error building remote catalog client")?;

    let engine = ReconcileEngine::new(config.clone(), catalog);
    let reporter = CliReporter::new();

    let confirm = |path: &std::path::Path| {
        let question = format!("Delete non-hardlinked file: {}?", path.display());
        match prompt::prompt_confirm(&question, Some(false)) {
            Ok(answer) => answer,
            Err(err) => {
                error!("Error reading confirmation: {}", err);
                false
            }
        }
    };

    let summary = engine
        .run(confirm, &reporter)
        .with_context(|| format!("Error processing {}", config.root_directory.display()))?;

    println!();
    info!(
        "{} non-hardlinked files found, saved to {}",
        format!("{}", summary.found).yellow(),
        engine.record().path().display(),
    );
    if config.batch_size > 0 {
        info!(
            "{} replaced, {} not in catalog, {} failed, {} left in record",
            format!("{}", summary.replaced).green(),
            format!("{}", summary.not_found).yellow(),
            format!("{}", summary.failed).red(),
            format!("{}", summary.remaining).cyan(),
        );
        for entry in &summary.orphaned {
            warn!(
                "{} (id {}) lost its file without a queued replacement, search for it manually",
                entry.title.yellow(),
                entry.id
            );
        }
        if summary.declined {
            info!("Stopped after a declined deletion");
        }
    }

    Ok(())
}
