//! Validate command implementation
//!
//! Checks that a persisted listing parses and passes structural validation.

use anyhow::{Context, Result};
use apicompat_core::{listing_fingerprint, Listing};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::process::ExitCode;

use super::exit_code;
use super::reporting::ERROR_PREFIX;

/// Machine-readable validate result.
#[derive(Debug, Serialize)]
struct ValidateOutput {
    valid: bool,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    assembly_identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    types: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    members: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the validate command
///
/// # Arguments
/// * `listing_path` - Path to the listing JSON file
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if valid, 1 if the listing is malformed
pub fn run(listing_path: &str, json_output: bool) -> Result<ExitCode> {
    let text = fs::read_to_string(listing_path)
        .with_context(|| format!("Failed to read listing: {}", listing_path))?;
    let parsed = Listing::from_json(&text);

    let output = match parsed {
        Ok(ref listing) => ValidateOutput {
            valid: true,
            path: listing_path.to_string(),
            assembly_identity: Some(listing.assembly_identity.clone()),
            types: Some(listing.types.len()),
            members: Some(listing.member_count()),
            fingerprint: Some(listing_fingerprint(listing)?),
            error: None,
        },
        Err(ref e) => ValidateOutput {
            valid: false,
            path: listing_path.to_string(),
            assembly_identity: None,
            types: None,
            members: None,
            fingerprint: None,
            error: Some(e.to_string()),
        },
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_human(&output);
    }

    Ok(exit_code(!output.valid))
}

fn print_human(output: &ValidateOutput) {
    println!("{} {}", "Validating:".cyan().bold(), output.path);
    if output.valid {
        println!(
            "  {} {}",
            "Assembly:".dimmed(),
            output.assembly_identity.as_deref().unwrap_or_default()
        );
        println!(
            "  {} {} types, {} members",
            "Surface:".dimmed(),
            output.types.unwrap_or_default(),
            output.members.unwrap_or_default()
        );
        if let Some(ref fingerprint) = output.fingerprint {
            println!("  {} {}", "Fingerprint:".dimmed(), fingerprint);
        }
        println!("\n{} Listing is valid", "SUCCESS".green().bold());
    } else {
        if let Some(ref error) = output.error {
            println!("{}{}", ERROR_PREFIX, error);
        }
        println!("\n{} Listing is invalid", "FAILED".red().bold());
    }
}
