//! End-to-end tests for the CLI commands, run against temporary files.

use apicompat_cli::commands::{batch, compare, extract, validate};
use apicompat_core::{Listing, MemberDescriptor, TypeDescriptor, Visibility};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tempfile::TempDir;

fn baseline() -> Listing {
    let mut listing = Listing::new("Lib").with_type(
        TypeDescriptor::class("Lib.Foo")
            .member(MemberDescriptor::constructor())
            .member(MemberDescriptor::method("Bar", "System.Void")),
    );
    listing.sort();
    listing
}

fn narrowed() -> Listing {
    let mut listing = Listing::new("Lib").with_type(
        TypeDescriptor::class("Lib.Foo")
            .member(MemberDescriptor::constructor())
            .member(
                MemberDescriptor::method("Bar", "System.Void").visibility(Visibility::Protected),
            ),
    );
    listing.sort();
    listing
}

fn write_listing(dir: &Path, name: &str, listing: &Listing) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, listing.to_json_pretty().unwrap()).unwrap();
    path
}

fn write_text(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

fn options<'a>(baseline: &'a str, candidate: &'a str) -> compare::CompareOptions<'a> {
    compare::CompareOptions {
        baseline,
        candidate,
        candidate_facts: false,
        exclusions: None,
        exclude_namespaces: &[],
        strict_exclusions: false,
        json: true,
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ============================================================================
// compare
// ============================================================================

#[test]
fn test_compare_identical_listings_pass() {
    let dir = TempDir::new().unwrap();
    let path = write_listing(dir.path(), "lib.json", &baseline());

    let code = compare::run(&options(path_str(&path), path_str(&path))).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
}

#[test]
fn test_compare_reports_narrowing() {
    let dir = TempDir::new().unwrap();
    let old = write_listing(dir.path(), "old.json", &baseline());
    let new = write_listing(dir.path(), "new.json", &narrowed());

    let code = compare::run(&compare::CompareOptions {
        json: false,
        ..options(path_str(&old), path_str(&new))
    })
    .unwrap();
    assert_eq!(code, ExitCode::from(1));
}

#[test]
fn test_compare_with_exclusions() {
    let dir = TempDir::new().unwrap();
    let old = write_listing(dir.path(), "old.json", &baseline());
    let new = write_listing(dir.path(), "new.json", &narrowed());
    let exclusions = write_text(
        dir.path(),
        "exclusions.json",
        r#"[{"TypeId": "public class Lib.Foo", "MemberId": "public System.Void Bar()"}]"#,
    );

    let code = compare::run(&compare::CompareOptions {
        exclusions: Some(path_str(&exclusions)),
        ..options(path_str(&old), path_str(&new))
    })
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
}

#[test]
fn test_compare_strict_exclusions() {
    let dir = TempDir::new().unwrap();
    let old = write_listing(dir.path(), "old.json", &baseline());
    let exclusions = write_text(
        dir.path(),
        "exclusions.json",
        r#"[{"TypeId": "public class Lib.Gone"}]"#,
    );
    let base = options(path_str(&old), path_str(&old));

    let lenient = compare::run(&compare::CompareOptions {
        exclusions: Some(path_str(&exclusions)),
        ..base.clone()
    })
    .unwrap();
    assert_eq!(lenient, ExitCode::SUCCESS);

    let strict = compare::run(&compare::CompareOptions {
        exclusions: Some(path_str(&exclusions)),
        strict_exclusions: true,
        ..base
    })
    .unwrap();
    assert_eq!(strict, ExitCode::from(1));
}

#[test]
fn test_compare_malformed_exclusions_is_fatal() {
    let dir = TempDir::new().unwrap();
    let old = write_listing(dir.path(), "old.json", &baseline());
    let exclusions = write_text(dir.path(), "exclusions.json", r#"[{"MemberId": "x"}]"#);

    let result = compare::run(&compare::CompareOptions {
        exclusions: Some(path_str(&exclusions)),
        ..options(path_str(&old), path_str(&old))
    });
    assert!(result.is_err());
}

#[test]
fn test_compare_namespace_filter() {
    let dir = TempDir::new().unwrap();
    let mut with_internal = baseline().with_type(TypeDescriptor::class("Lib.Internal.Cache"));
    with_internal.sort();
    let old = write_listing(dir.path(), "old.json", &with_internal);
    let new = write_listing(dir.path(), "new.json", &baseline());
    let namespaces = vec!["Lib.Internal".to_string()];

    let unfiltered = compare::run(&options(path_str(&old), path_str(&new))).unwrap();
    assert_eq!(unfiltered, ExitCode::from(1));

    let filtered = compare::run(&compare::CompareOptions {
        exclude_namespaces: &namespaces,
        ..options(path_str(&old), path_str(&new))
    })
    .unwrap();
    assert_eq!(filtered, ExitCode::SUCCESS);
}

#[test]
fn test_compare_against_fact_set() {
    let dir = TempDir::new().unwrap();
    let old = write_listing(
        dir.path(),
        "old.json",
        &Listing::new("Lib").with_type(TypeDescriptor::class("Lib.Foo")),
    );
    let facts = write_text(
        dir.path(),
        "facts.json",
        r#"{
            "assembly_identity": "Lib",
            "types": [{
                "reference": {"kind": "named", "namespace": "Lib", "name": "Foo"},
                "visibility": "Public",
                "kind": "Class"
            }]
        }"#,
    );

    let code = compare::run(&compare::CompareOptions {
        candidate_facts: true,
        ..options(path_str(&old), path_str(&facts))
    })
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
}

#[test]
fn test_compare_invalid_baseline_is_fatal() {
    let dir = TempDir::new().unwrap();
    let bad = write_text(dir.path(), "bad.json", r#"{"Types": []}"#);
    let good = write_listing(dir.path(), "good.json", &baseline());

    assert!(compare::run(&options(path_str(&bad), path_str(&good))).is_err());
}

// ============================================================================
// extract / validate
// ============================================================================

#[test]
fn test_extract_writes_valid_listing() {
    let dir = TempDir::new().unwrap();
    let facts = write_text(
        dir.path(),
        "facts.json",
        r#"{
            "assembly_identity": "Lib",
            "types": [
                {
                    "reference": {"kind": "named", "namespace": "Lib", "name": "Foo"},
                    "visibility": "Public",
                    "kind": "Class",
                    "members": [{"kind": "Constructor", "name": ".ctor", "visibility": "Public"}]
                },
                {
                    "reference": {"kind": "named", "namespace": "Lib", "name": "Hidden"},
                    "visibility": "Internal",
                    "kind": "Class"
                }
            ]
        }"#,
    );
    let output = dir.path().join("out").join("lib.json");

    let code = extract::run(path_str(&facts), Some(path_str(&output)), false).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
    let listing = Listing::from_json(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(listing.types.len(), 1);
    assert_eq!(listing.types[0].members[0].id(), "public .ctor()");

    let code = extract::run(path_str(&facts), Some(path_str(&output)), true).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
    let listing = Listing::from_json(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(listing.types.len(), 2);
}

#[test]
fn test_extract_synthesized_type_is_fatal() {
    let dir = TempDir::new().unwrap();
    let facts = write_text(
        dir.path(),
        "facts.json",
        r#"{
            "assembly_identity": "Lib",
            "types": [{
                "reference": {"kind": "named", "namespace": "Lib", "name": "<>c"},
                "visibility": "Public",
                "kind": "Class"
            }]
        }"#,
    );
    let output = dir.path().join("lib.json");

    assert!(extract::run(path_str(&facts), Some(path_str(&output)), false).is_err());
    assert!(!output.exists());
}

#[test]
fn test_validate_exit_codes() {
    let dir = TempDir::new().unwrap();
    let good = write_listing(dir.path(), "good.json", &baseline());
    let bad = write_text(
        dir.path(),
        "bad.json",
        r#"{"AssemblyIdentity": "Lib", "Types": [{"Name": "Lib.A", "Visibility": "Public", "Kind": "Interface", "Sealed": true}]}"#,
    );

    assert_eq!(validate::run(path_str(&good), true).unwrap(), ExitCode::SUCCESS);
    assert_eq!(validate::run(path_str(&bad), false).unwrap(), ExitCode::from(1));
    assert!(validate::run(path_str(&dir.path().join("missing.json")), true).is_err());
}

// ============================================================================
// batch
// ============================================================================

#[test]
fn test_discover_listings_is_sorted_and_relative() {
    let dir = TempDir::new().unwrap();
    write_listing(dir.path(), "net8/Lib.json", &baseline());
    write_listing(dir.path(), "net6/Lib.json", &baseline());
    write_text(dir.path(), "README.md", "not a listing");

    let found = batch::discover_listings(dir.path());
    assert_eq!(
        found,
        vec![PathBuf::from("net6/Lib.json"), PathBuf::from("net8/Lib.json")]
    );
}

#[test]
fn test_batch_statuses() {
    let old = TempDir::new().unwrap();
    let new = TempDir::new().unwrap();
    write_listing(old.path(), "a.json", &baseline());
    write_listing(new.path(), "a.json", &baseline());
    write_listing(old.path(), "b.json", &baseline());
    write_listing(new.path(), "b.json", &narrowed());
    write_listing(old.path(), "c.json", &baseline());

    let exclusions = apicompat_core::Exclusions::new();
    let filter = apicompat_core::keep_all();
    let listings = batch::discover_listings(old.path());
    let report = batch::compare_all(
        old.path(),
        new.path(),
        &listings,
        &exclusions,
        filter.as_ref(),
    );

    let statuses: Vec<(&str, batch::PairStatus)> = report
        .results
        .iter()
        .map(|r| (r.listing.as_str(), r.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("a.json", batch::PairStatus::Passed),
            ("b.json", batch::PairStatus::Failed),
            ("c.json", batch::PairStatus::Missing),
        ]
    );
    assert_eq!(report.passed, 1);
    assert_eq!(report.failed, 2);
    assert_eq!(report.errors, 0);
}

#[test]
fn test_batch_exit_codes() {
    let old = TempDir::new().unwrap();
    let new = TempDir::new().unwrap();
    write_listing(old.path(), "a.json", &baseline());
    write_listing(new.path(), "a.json", &baseline());
    let run = || {
        batch::run(
            path_str(old.path()),
            path_str(new.path()),
            None,
            &[],
            true,
        )
        .unwrap()
    };
    assert_eq!(run(), ExitCode::SUCCESS);

    write_text(new.path(), "a.json", "{ not json");
    assert_eq!(run(), ExitCode::from(2));
}

#[test]
fn test_batch_unused_exclusions_span_all_pairs() {
    let old = TempDir::new().unwrap();
    let new = TempDir::new().unwrap();
    write_listing(old.path(), "a.json", &baseline());
    write_listing(new.path(), "a.json", &narrowed());
    write_listing(old.path(), "b.json", &baseline());
    write_listing(new.path(), "b.json", &baseline());

    let used =
        apicompat_core::Exclusion::for_member("public class Lib.Foo", "public System.Void Bar()");
    let stale = apicompat_core::Exclusion::for_type("public class Lib.Gone");
    let exclusions: apicompat_core::Exclusions = [used, stale.clone()].into_iter().collect();
    let filter = apicompat_core::keep_all();
    let listings = batch::discover_listings(old.path());

    let report = batch::compare_all(
        old.path(),
        new.path(),
        &listings,
        &exclusions,
        filter.as_ref(),
    );
    assert_eq!(report.failed, 0);
    assert_eq!(report.unused_exclusions, vec![stale]);
}
