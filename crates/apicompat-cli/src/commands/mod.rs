//! CLI command implementations

pub mod batch;
pub mod compare;
pub mod extract;
pub mod validate;

mod reporting;

use anyhow::Result;
use apicompat_core::{exclude_namespaces, keep_all, DescriptorFilter, Exclusions};
use std::path::Path;
use std::process::ExitCode;

use crate::exclusions::load_exclusions;

/// Exit code when a comparison found unsuppressed violations.
pub const VIOLATIONS_EXIT_CODE: u8 = 1;

/// Loads the exclusions file if one was given.
pub(crate) fn load_exclusion_set(path: Option<&str>) -> Result<Exclusions> {
    match path {
        Some(path) => Ok(load_exclusions(Path::new(path))?),
        None => Ok(Exclusions::new()),
    }
}

/// Builds the descriptor filter for `--exclude-namespace` flags.
pub(crate) fn namespace_filter(namespaces: &[String]) -> Box<DescriptorFilter> {
    if namespaces.is_empty() {
        keep_all()
    } else {
        exclude_namespaces(namespaces.iter().cloned())
    }
}

pub(crate) fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::from(VIOLATIONS_EXIT_CODE)
    } else {
        ExitCode::SUCCESS
    }
}
