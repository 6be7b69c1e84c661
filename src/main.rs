//! `revision-report`: resolve analyzed dependencies against the revisions API
//! and print a license notice or a raw dependency manifest.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and merge them with the config file ([`config`]).
//! 2. Read the upstream analysis output ([`analysis`]).
//! 3. For the licenses report, encode locators ([`locator`]), fetch them in
//!    pages ([`fetch`]) and group the results by license ([`license`]).
//! 4. Render the requested report to stdout ([`report`]).
//!
//! Any error ends the run with status `1`; nothing is printed to stdout unless
//! the whole report succeeded.

mod analysis;
mod api;
mod cli;
mod config;
mod error;
mod fetch;
mod license;
mod locator;
mod models;
mod progress;
mod report;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use api::ApiClient;
use cli::Cli;
use config::{load_config, resolve};
use progress::{Progress, Silent, Spinner};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("could not determine working directory")?;
    let file = load_config(&cwd, cli.config.as_deref())?;
    let settings = resolve(&cli, file);

    let analyses = analysis::load_analyses(&cli.analysis)?;
    tracing::debug!(
        modules = analyses.len(),
        endpoint = %settings.endpoint,
        "loaded analysis"
    );

    let mut progress: Box<dyn Progress> = if cli.quiet {
        Box::new(Silent)
    } else {
        Box::new(Spinner::new())
    };

    // Buffer the report so a failure part-way leaves stdout untouched.
    let mut out = Vec::new();
    let api_key = settings.api_key.as_deref().unwrap_or_default();
    report::run(
        &settings.report_type,
        settings.page_size,
        &analyses,
        || ApiClient::new(&settings.endpoint, api_key),
        progress.as_mut(),
        &mut out,
    )
    .await
    .context("could not generate report")?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&out)?;
    stdout.flush()?;
    Ok(())
}
