//! Determinism checks for serialized listings.
//!
//! A listing is a text artifact checked into source control next to the
//! library it describes, so two extractions of the same facts must produce
//! identical bytes. Differences are reported by line to keep failures
//! readable.

use std::fmt;

/// Result of a determinism verification.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether all runs produced identical output.
    pub is_deterministic: bool,
    /// Number of runs performed.
    pub runs: usize,
    /// BLAKE3 hash of the first run's output.
    pub hash: String,
    /// The first differing line, if any.
    pub diff: Option<LineDiff>,
}

/// First line that differs between the reference run and a later run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiff {
    /// 1-based line number.
    pub line: usize,
    pub expected: Option<String>,
    pub actual: Option<String>,
    /// Which run (0-indexed) produced the differing output.
    pub run_index: usize,
}

impl fmt::Display for LineDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Difference at line {} (run {}):\n  expected: {}\n  actual:   {}",
            self.line,
            self.run_index,
            self.expected.as_deref().unwrap_or("<end of output>"),
            self.actual.as_deref().unwrap_or("<end of output>")
        )
    }
}

impl DeterminismResult {
    /// Panic with a detailed message if not deterministic.
    pub fn assert_deterministic(&self) {
        if let Some(ref diff) = self.diff {
            panic!(
                "Non-deterministic output detected!\nRuns: {}\nHash: {}\n{}",
                self.runs, self.hash, diff
            );
        }
    }
}

/// Runs `produce` `runs` times and checks every output matches the first.
///
/// # Panics
///
/// Panics if `runs` is less than 2.
pub fn verify_determinism<F, O>(produce: F, runs: usize) -> DeterminismResult
where
    F: Fn() -> O,
    O: AsRef<str>,
{
    assert!(runs >= 2, "Must run at least 2 times to verify determinism");

    let reference = produce();
    let reference = reference.as_ref();
    let hash = blake3::hash(reference.as_bytes()).to_hex().to_string();

    for run_index in 1..runs {
        let output = produce();
        let output = output.as_ref();
        if output == reference {
            continue;
        }
        return DeterminismResult {
            is_deterministic: false,
            runs,
            hash,
            diff: Some(first_difference(reference, output, run_index)),
        };
    }

    DeterminismResult {
        is_deterministic: true,
        runs,
        hash,
        diff: None,
    }
}

fn first_difference(expected: &str, actual: &str, run_index: usize) -> LineDiff {
    let mut left = expected.lines();
    let mut right = actual.lines();
    let mut line = 1;
    loop {
        let (a, b) = (left.next(), right.next());
        if a != b || (a.is_none() && b.is_none()) {
            return LineDiff {
                line,
                expected: a.map(str::to_string),
                actual: b.map(str::to_string),
                run_index,
            };
        }
        line += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_identical_runs_are_deterministic() {
        let result = verify_determinism(|| "a\nb\n".to_string(), 3);
        assert!(result.is_deterministic);
        assert_eq!(result.runs, 3);
        assert_eq!(result.hash.len(), 64);
        result.assert_deterministic();
    }

    #[test]
    fn test_reports_first_differing_line() {
        let counter = Cell::new(0);
        let result = verify_determinism(
            || {
                counter.set(counter.get() + 1);
                format!("same\nrun {}\n", counter.get())
            },
            2,
        );
        assert!(!result.is_deterministic);
        assert_eq!(
            result.diff,
            Some(LineDiff {
                line: 2,
                expected: Some("run 1".to_string()),
                actual: Some("run 2".to_string()),
                run_index: 1,
            })
        );
    }

    #[test]
    fn test_reports_truncated_output() {
        let counter = Cell::new(0);
        let result = verify_determinism(
            || {
                counter.set(counter.get() + 1);
                if counter.get() == 1 { "a\nb" } else { "a" }
            },
            2,
        );
        let diff = result.diff.unwrap();
        assert_eq!(diff.line, 2);
        assert_eq!(diff.actual, None);
    }

    #[test]
    #[should_panic(expected = "Non-deterministic output detected")]
    fn test_assert_panics_on_difference() {
        let counter = Cell::new(0);
        verify_determinism(
            || {
                counter.set(counter.get() + 1);
                counter.get().to_string()
            },
            2,
        )
        .assert_deterministic();
    }
}
