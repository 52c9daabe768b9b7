//! Exclusions file loading.
//!
//! An exclusions file is a JSON array of approved violations:
//!
//! ```json
//! [
//!   {"TypeId": "public class Lib.Foo", "MemberId": "public System.Void Bar()"},
//!   {"TypeId": "public sealed class Lib.Baz"}
//! ]
//! ```
//!
//! Omitting `MemberId` approves the type-level violation only.

use apicompat_core::{Exclusion, Exclusions};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A malformed exclusions file.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("failed to read exclusions file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed exclusions file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("exclusion #{index} in {} has an empty TypeId", .path.display())]
    EmptyTypeId { path: PathBuf, index: usize },

    #[error(
        "exclusion #{index} in {} has an empty MemberId (omit it to exclude a type-level violation)",
        .path.display()
    )]
    EmptyMemberId { path: PathBuf, index: usize },

    #[error("exclusion #{index} in {} duplicates an earlier entry", .path.display())]
    Duplicate { path: PathBuf, index: usize },
}

/// Reads and parses an exclusions file.
pub fn load_exclusions(path: &Path) -> Result<Exclusions, ConfigurationError> {
    let json = fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_exclusions(&json, path)
}

/// Parses exclusions JSON; `path` is only used in error messages.
pub fn parse_exclusions(json: &str, path: &Path) -> Result<Exclusions, ConfigurationError> {
    let entries: Vec<Exclusion> =
        serde_json::from_str(json).map_err(|source| ConfigurationError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut seen = HashSet::new();
    for (index, entry) in entries.iter().enumerate() {
        if entry.type_id.trim().is_empty() {
            return Err(ConfigurationError::EmptyTypeId {
                path: path.to_path_buf(),
                index,
            });
        }
        if entry.member_id.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(ConfigurationError::EmptyMemberId {
                path: path.to_path_buf(),
                index,
            });
        }
        if !seen.insert(entry) {
            return Err(ConfigurationError::Duplicate {
                path: path.to_path_buf(),
                index,
            });
        }
    }

    Ok(entries.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use apicompat_core::{Violation, ViolationKind};

    fn parse(json: &str) -> Result<Exclusions, ConfigurationError> {
        parse_exclusions(json, Path::new("exclusions.json"))
    }

    #[test]
    fn test_parse_type_and_member_exclusions() {
        let exclusions = parse(
            r#"[
                {"TypeId": "public class Lib.Foo", "MemberId": "public System.Void Bar()"},
                {"TypeId": "public sealed class Lib.Baz"}
            ]"#,
        )
        .unwrap();

        assert_eq!(exclusions.len(), 2);
        assert!(exclusions.contains(&Violation::with_member(
            ViolationKind::MemberRemoved,
            "public class Lib.Foo",
            "public System.Void Bar()",
            "",
        )));
        assert!(exclusions.contains(&Violation::new(
            ViolationKind::TypeChanged,
            "public sealed class Lib.Baz",
            "",
        )));
        assert!(!exclusions.contains(&Violation::new(
            ViolationKind::TypeRemoved,
            "public class Lib.Foo",
            "",
        )));
    }

    #[test]
    fn test_empty_file_array() {
        assert!(parse("[]").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json() {
        let err = parse(r#"{"TypeId": "x"}"#).unwrap_err();
        assert!(matches!(err, ConfigurationError::Parse { .. }));
        assert!(err.to_string().contains("exclusions.json"));
    }

    #[test]
    fn test_missing_type_id() {
        let err = parse(r#"[{"MemberId": "public System.Void Bar()"}]"#).unwrap_err();
        assert!(matches!(err, ConfigurationError::Parse { .. }));
    }

    #[test]
    fn test_empty_ids_are_rejected() {
        let err = parse(r#"[{"TypeId": "  "}]"#).unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyTypeId { index: 0, .. }));

        let err = parse(
            r#"[{"TypeId": "public class Lib.Foo"}, {"TypeId": "public class Lib.Foo", "MemberId": ""}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyMemberId { index: 1, .. }));
    }

    #[test]
    fn test_duplicates_are_rejected() {
        let err =
            parse(r#"[{"TypeId": "public class Lib.Foo"}, {"TypeId": "public class Lib.Foo"}]"#)
                .unwrap_err();
        assert!(matches!(err, ConfigurationError::Duplicate { index: 1, .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_exclusions(&dir.path().join("none.json")).unwrap_err();
        assert!(matches!(err, ConfigurationError::Io { .. }));
    }
}
