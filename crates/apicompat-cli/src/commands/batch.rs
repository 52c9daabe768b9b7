//! Batch compare command
//!
//! Pairs every `*.json` listing under a baseline directory with the listing
//! at the same relative path under a candidate directory and compares the
//! pairs in parallel.

use anyhow::{bail, Result};
use apicompat_core::{compare_listings, DescriptorFilter, Exclusion, Exclusions, Violation};
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::debug;
use walkdir::WalkDir;

use super::reporting::{unused_exclusion_line, violation_line, ERROR_PREFIX};
use super::{load_exclusion_set, namespace_filter, VIOLATIONS_EXIT_CODE};
use crate::input::load_listing;

/// Exit code when at least one pair could not be loaded.
const LOAD_ERROR_EXIT_CODE: u8 = 2;

/// Outcome of one listing pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairStatus {
    Passed,
    Failed,
    /// No candidate listing at the baseline's relative path.
    Missing,
    /// Either listing could not be loaded.
    Error,
}

#[derive(Debug, Serialize)]
pub struct BatchResult {
    pub listing: String,
    pub status: PairStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
    pub suppressed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    unused: BTreeSet<Exclusion>,
}

#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub results: Vec<BatchResult>,
    /// Exclusions that matched nothing in any pair.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unused_exclusions: Vec<Exclusion>,
}

/// Run batch comparison
///
/// # Returns
/// Exit code: 0 if every pair passes, 1 on violations or missing candidates,
/// 2 if any listing could not be loaded
pub fn run(
    baseline_dir: &str,
    candidate_dir: &str,
    exclusions: Option<&str>,
    exclude_namespaces: &[String],
    json_output: bool,
) -> Result<ExitCode> {
    let baseline_root = Path::new(baseline_dir);
    let candidate_root = Path::new(candidate_dir);
    if !baseline_root.is_dir() {
        bail!("Baseline directory not found: {}", baseline_dir);
    }
    if !candidate_root.is_dir() {
        bail!("Candidate directory not found: {}", candidate_dir);
    }

    let exclusions = load_exclusion_set(exclusions)?;
    let filter = namespace_filter(exclude_namespaces);
    let listings = discover_listings(baseline_root);

    if listings.is_empty() {
        if !json_output {
            println!("No listings found in: {}", baseline_dir);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let start = Instant::now();
    let report = compare_all(
        baseline_root,
        candidate_root,
        &listings,
        &exclusions,
        filter.as_ref(),
    );
    debug!(
        pairs = report.total,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "batch comparison complete"
    );

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_human(&report, start.elapsed().as_secs_f64());
    }

    Ok(if report.errors > 0 {
        ExitCode::from(LOAD_ERROR_EXIT_CODE)
    } else if report.failed > 0 {
        ExitCode::from(VIOLATIONS_EXIT_CODE)
    } else {
        ExitCode::SUCCESS
    })
}

/// Relative paths of all `*.json` files under `root`, sorted.
pub fn discover_listings(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect()
}

/// Compares every pair and aggregates the results in discovery order.
pub fn compare_all(
    baseline_root: &Path,
    candidate_root: &Path,
    listings: &[PathBuf],
    exclusions: &Exclusions,
    filter: &DescriptorFilter,
) -> BatchReport {
    let results: Vec<BatchResult> = listings
        .par_iter()
        .map(|relative| compare_pair(baseline_root, candidate_root, relative, exclusions, filter))
        .collect();

    let count = |status: PairStatus| results.iter().filter(|r| r.status == status).count();
    let passed = count(PairStatus::Passed);
    let failed = count(PairStatus::Failed) + count(PairStatus::Missing);
    let errors = count(PairStatus::Error);

    // An exclusion is stale only if no compared pair used it.
    let compared: Vec<&BatchResult> = results
        .iter()
        .filter(|r| matches!(r.status, PairStatus::Passed | PairStatus::Failed))
        .collect();
    let unused_exclusions = if compared.is_empty() {
        Vec::new()
    } else {
        exclusions
            .iter()
            .filter(|e| compared.iter().all(|r| r.unused.contains(*e)))
            .cloned()
            .collect()
    };

    BatchReport {
        total: results.len(),
        passed,
        failed,
        errors,
        results,
        unused_exclusions,
    }
}

fn compare_pair(
    baseline_root: &Path,
    candidate_root: &Path,
    relative: &Path,
    exclusions: &Exclusions,
    filter: &DescriptorFilter,
) -> BatchResult {
    let name = relative.to_string_lossy().replace('\\', "/");
    let result = |status, error: Option<String>| BatchResult {
        listing: name.clone(),
        status,
        violations: Vec::new(),
        suppressed: 0,
        error,
        unused: BTreeSet::new(),
    };

    let candidate_path = candidate_root.join(relative);
    if !candidate_path.is_file() {
        return result(
            PairStatus::Missing,
            Some(format!("no candidate listing at {}", candidate_path.display())),
        );
    }

    let loaded = load_listing(&baseline_root.join(relative))
        .and_then(|baseline| load_listing(&candidate_path).map(|candidate| (baseline, candidate)));
    let (baseline, candidate) = match loaded {
        Ok(pair) => pair,
        Err(e) => return result(PairStatus::Error, Some(format!("{:#}", e))),
    };

    let report = compare_listings(&baseline, &candidate, exclusions, filter);
    BatchResult {
        listing: name.clone(),
        status: if report.passed() {
            PairStatus::Passed
        } else {
            PairStatus::Failed
        },
        suppressed: report.suppressed.len(),
        unused: report.unused_exclusions.into_iter().collect(),
        violations: report.violations,
        error: None,
    }
}

fn print_human(report: &BatchReport, elapsed_secs: f64) {
    println!("Comparing {} listings...", report.total);

    for (i, result) in report.results.iter().enumerate() {
        let progress = format!("[{}/{}]", i + 1, report.total).cyan().bold();
        let status = match result.status {
            PairStatus::Passed => "✓ PASS".green().bold(),
            PairStatus::Failed => "✗ FAIL".red().bold(),
            PairStatus::Missing => "✗ MISSING".red().bold(),
            PairStatus::Error => "✗ ERROR".red().bold(),
        };
        println!("\n{} {} {}", progress, result.listing, status);

        for violation in &result.violations {
            println!("{}", violation_line(violation, Some(&result.listing)));
        }
        if let Some(ref error) = result.error {
            println!("{}{}: {}", ERROR_PREFIX, result.listing, error);
        }
    }

    if !report.unused_exclusions.is_empty() {
        println!();
        for exclusion in &report.unused_exclusions {
            println!("{}", unused_exclusion_line(exclusion));
        }
    }

    println!("\n{}", "=".repeat(60));
    println!(
        "{} {} {}",
        "Batch Comparison Summary".bold(),
        "•".dimmed(),
        format!("{:.1}s total", elapsed_secs).dimmed()
    );
    println!("  Total:  {}", report.total);
    println!(
        "  Passed: {}",
        if report.failed == 0 && report.errors == 0 {
            report.passed.to_string().green()
        } else {
            report.passed.to_string().normal()
        }
    );
    println!(
        "  Failed: {}",
        if report.failed > 0 {
            report.failed.to_string().red()
        } else {
            report.failed.to_string().normal()
        }
    );
    println!(
        "  Errors: {}",
        if report.errors > 0 {
            report.errors.to_string().red()
        } else {
            report.errors.to_string().normal()
        }
    );
}

