//! Extract command implementation
//!
//! Reads a fact set, extracts its listing and writes it as JSON.

use anyhow::Result;
use apicompat_core::listing_fingerprint;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use crate::input::{extract_from_facts, write_listing};

/// Run the extract command
///
/// # Arguments
/// * `facts` - Path to the fact set JSON file
/// * `output` - Output file path (stdout when `None`)
/// * `include_internal` - Also export internal types and members
///
/// # Returns
/// Exit code: 0 on success; extraction failures are returned as errors
pub fn run(facts: &str, output: Option<&str>, include_internal: bool) -> Result<ExitCode> {
    let listing = extract_from_facts(Path::new(facts), include_internal)?;
    let fingerprint = listing_fingerprint(&listing)?;
    write_listing(&listing, output.map(Path::new))?;

    // stdout carries the listing when no output path is given
    let summary = format!(
        "{} {} types, {} members from {}",
        "Extracted".green().bold(),
        listing.types.len(),
        listing.member_count(),
        listing.assembly_identity
    );
    let hash = format!("{} {}", "Fingerprint:".dimmed(), &fingerprint[..16]);
    match output {
        Some(path) => {
            println!("{}", summary);
            println!("{}", hash);
            println!("{} {}", "Written to:".dimmed(), path);
        }
        None => {
            eprintln!("{}", summary);
            eprintln!("{}", hash);
        }
    }

    Ok(ExitCode::SUCCESS)
}
