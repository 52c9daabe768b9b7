//! Compare command implementation
//!
//! Compares a candidate listing (or fact set) against a baseline listing and
//! reports every unsuppressed breaking change.

use anyhow::Result;
use apicompat_core::{compare_listings, listing_fingerprint, ComparisonReport, Listing};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use super::reporting::print_report_lines;
use super::{exit_code, load_exclusion_set, namespace_filter};
use crate::input::{extract_from_facts, load_listing};

/// Options for one comparison.
#[derive(Debug, Clone)]
pub struct CompareOptions<'a> {
    pub baseline: &'a str,
    pub candidate: &'a str,
    /// The candidate is a fact set to extract first.
    pub candidate_facts: bool,
    pub exclusions: Option<&'a str>,
    pub exclude_namespaces: &'a [String],
    /// Unused exclusions fail the run.
    pub strict_exclusions: bool,
    pub json: bool,
}

/// Machine-readable compare result.
#[derive(Debug, Serialize)]
struct CompareOutput<'a> {
    passed: bool,
    baseline: &'a str,
    baseline_fingerprint: String,
    candidate: &'a str,
    candidate_fingerprint: String,
    #[serde(flatten)]
    report: &'a ComparisonReport,
}

/// Run the compare command
///
/// # Returns
/// Exit code: 0 on pass, 1 if unsuppressed violations remain (or unused
/// exclusions with `strict_exclusions`)
pub fn run(options: &CompareOptions<'_>) -> Result<ExitCode> {
    let baseline = load_listing(Path::new(options.baseline))?;
    let candidate = if options.candidate_facts {
        extract_from_facts(Path::new(options.candidate), false)?
    } else {
        load_listing(Path::new(options.candidate))?
    };
    let exclusions = load_exclusion_set(options.exclusions)?;
    let filter = namespace_filter(options.exclude_namespaces);

    let report = compare_listings(&baseline, &candidate, &exclusions, filter.as_ref());
    let failed = is_failure(&report, options.strict_exclusions);

    if options.json {
        let output = CompareOutput {
            passed: !failed,
            baseline: options.baseline,
            baseline_fingerprint: listing_fingerprint(&baseline)?,
            candidate: options.candidate,
            candidate_fingerprint: listing_fingerprint(&candidate)?,
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_human(&baseline, &candidate, &report, failed);
    }

    Ok(exit_code(failed))
}

/// A run fails on unsuppressed violations, and on unused exclusions when strict.
pub fn is_failure(report: &ComparisonReport, strict_exclusions: bool) -> bool {
    !report.passed() || (strict_exclusions && !report.unused_exclusions.is_empty())
}

fn print_human(baseline: &Listing, candidate: &Listing, report: &ComparisonReport, failed: bool) {
    println!("{}", "Comparing listings:".cyan().bold());
    println!("  {} {}", "Baseline:".dimmed(), baseline.assembly_identity);
    println!("  {} {}", "Candidate:".dimmed(), candidate.assembly_identity);
    println!();

    print_report_lines(report, None);

    println!(
        "\n{} {} violation(s), {} suppressed, {} unused exclusion(s)",
        if failed {
            "FAILED".red().bold()
        } else {
            "PASSED".green().bold()
        },
        report.violations.len(),
        report.suppressed.len(),
        report.unused_exclusions.len()
    );
}
