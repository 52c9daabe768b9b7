//! CLI argument definitions for the apicompat command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Parser, Subcommand};

/// apicompat - API surface listings and breaking-change checks
#[derive(Parser)]
#[command(name = "apicompat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Extract a listing from a fact set
    Extract {
        /// Path to the fact set JSON file
        #[arg(short, long)]
        facts: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Also export internal types and members
        #[arg(long)]
        include_internal: bool,
    },

    /// Validate a persisted listing
    Validate {
        /// Path to the listing JSON file
        #[arg(short, long)]
        listing: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Compare a candidate against a baseline listing
    Compare {
        /// Path to the baseline listing
        #[arg(short, long)]
        baseline: String,

        /// Path to the candidate listing (or fact set with --candidate-facts)
        #[arg(short, long)]
        candidate: String,

        /// Treat the candidate as a fact set and extract it first
        #[arg(long)]
        candidate_facts: bool,

        /// Path to an exclusions file
        #[arg(short, long)]
        exclusions: Option<String>,

        /// Namespace to leave out of the comparison (repeatable)
        #[arg(long = "exclude-namespace")]
        exclude_namespaces: Vec<String>,

        /// Fail when an exclusion matches no violation
        #[arg(long)]
        strict_exclusions: bool,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Compare every listing in a directory against a baseline directory
    Batch {
        /// Directory of baseline listings
        #[arg(long)]
        baseline_dir: String,

        /// Directory of candidate listings, paired by relative path
        #[arg(long)]
        candidate_dir: String,

        /// Path to an exclusions file applied to every pair
        #[arg(short, long)]
        exclusions: Option<String>,

        /// Namespace to leave out of the comparison (repeatable)
        #[arg(long = "exclude-namespace")]
        exclude_namespaces: Vec<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}
