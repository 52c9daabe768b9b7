//! Loading listings and fact sets from disk.

use anyhow::{Context, Result};
use apicompat_core::{Extractor, FactSet, Listing, VisibilityFilter};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads and validates a persisted listing.
pub fn load_listing(path: &Path) -> Result<Listing> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read listing: {}", path.display()))?;
    let listing = Listing::from_json(&json)
        .with_context(|| format!("Invalid listing: {}", path.display()))?;
    debug!(
        path = %path.display(),
        types = listing.types.len(),
        "loaded listing"
    );
    Ok(listing)
}

/// Reads a fact set document.
pub fn load_fact_set(path: &Path) -> Result<FactSet> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read fact set: {}", path.display()))?;
    FactSet::from_json(&json).with_context(|| format!("Invalid fact set: {}", path.display()))
}

/// Reads a fact set and extracts its listing.
pub fn extract_from_facts(path: &Path, include_internal: bool) -> Result<Listing> {
    let facts = load_fact_set(path)?;
    let filter = if include_internal {
        VisibilityFilter::including_internal()
    } else {
        VisibilityFilter::default()
    };
    Extractor::new(&facts)
        .with_filter(filter)
        .extract()
        .with_context(|| format!("Extraction failed: {}", path.display()))
}

/// Writes a listing as pretty JSON to `output`, or to stdout when absent.
pub fn write_listing(listing: &Listing, output: Option<&Path>) -> Result<()> {
    let json = listing.to_json_pretty()?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
            fs::write(path, format!("{}\n", json))
                .with_context(|| format!("Failed to write listing: {}", path.display()))
        }
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}
