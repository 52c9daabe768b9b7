//! Line formatting shared by the compare and batch commands.
//!
//! Breaking-change lines start with `error : ` and stale exclusions with
//! `warning : ` so CI log scrapers can pick them up. The prefixes are never
//! colored.

use apicompat_core::{ComparisonReport, Exclusion, Violation};
use colored::Colorize;

pub(crate) const ERROR_PREFIX: &str = "error : ";
pub(crate) const WARNING_PREFIX: &str = "warning : ";

/// `error : [origin: ]AC003 MemberRemoved: <description>`
pub(crate) fn violation_line(violation: &Violation, origin: Option<&str>) -> String {
    let mut line = String::from(ERROR_PREFIX);
    if let Some(origin) = origin {
        line.push_str(origin);
        line.push_str(": ");
    }
    line.push_str(&format!(
        "{} {}: {}",
        violation.kind.code().red().bold(),
        violation.kind.as_str(),
        violation.description
    ));
    line
}

/// `warning : exclusion matched no violation: TypeId `..`[, MemberId `..`]`
pub(crate) fn unused_exclusion_line(exclusion: &Exclusion) -> String {
    let mut line = format!(
        "{}exclusion matched no violation: TypeId `{}`",
        WARNING_PREFIX, exclusion.type_id
    );
    if let Some(ref member_id) = exclusion.member_id {
        line.push_str(&format!(", MemberId `{}`", member_id));
    }
    line
}

/// Prints every violation and unused exclusion of a report.
pub(crate) fn print_report_lines(report: &ComparisonReport, origin: Option<&str>) {
    for violation in &report.violations {
        println!("{}", violation_line(violation, origin));
    }
    for exclusion in &report.unused_exclusions {
        println!("{}", unused_exclusion_line(exclusion));
    }
}
