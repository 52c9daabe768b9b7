//! apicompat CLI - API surface extraction and breaking-change checks
//!
//! This binary extracts listings from fact sets, validates persisted
//! listings, and compares candidates against baselines for CI pipelines.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli_args;

use apicompat_cli::commands;
use cli_args::{Cli, Commands};

/// Exit code for fatal errors (unreadable input, malformed listing or exclusions).
const FATAL_EXIT_CODE: u8 = 2;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            facts,
            output,
            include_internal,
        } => commands::extract::run(&facts, output.as_deref(), include_internal),
        Commands::Validate { listing, json } => commands::validate::run(&listing, json),
        Commands::Compare {
            baseline,
            candidate,
            candidate_facts,
            exclusions,
            exclude_namespaces,
            strict_exclusions,
            json,
        } => commands::compare::run(&commands::compare::CompareOptions {
            baseline: &baseline,
            candidate: &candidate,
            candidate_facts,
            exclusions: exclusions.as_deref(),
            exclude_namespaces: &exclude_namespaces,
            strict_exclusions,
            json,
        }),
        Commands::Batch {
            baseline_dir,
            candidate_dir,
            exclusions,
            exclude_namespaces,
            json,
        } => commands::batch::run(
            &baseline_dir,
            &candidate_dir,
            exclusions.as_deref(),
            &exclude_namespaces,
            json,
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(FATAL_EXIT_CODE)
        }
    }
}
