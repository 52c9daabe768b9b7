//! Listings written to disk and read back behave like fresh extractions.

use std::fs;

use apicompat_core::{listing_fingerprint, Comparator, FactSet, Listing, SchemaError};
use apicompat_tests::fixtures::{
    class, constructor, implementing_method, interface, interface_method, lib, system,
    ListingDirs, ModuleBuilder,
};
use pretty_assertions::assert_eq;

fn module() -> ModuleBuilder {
    let mut circle = class("Circle");
    circle.facts.interfaces.push(lib("IShape"));
    ModuleBuilder::new("Shapes, Version=1.0.0.0")
        .with(interface("IShape").member(interface_method("Area")))
        .with(
            circle
                .member(constructor(&[("radius", system("Double"))]))
                .member(implementing_method("Area", lib("IShape"))),
        )
}

#[test]
fn reloaded_listing_equals_extraction() {
    let dirs = ListingDirs::new();
    let listing = module().listing();
    let path = dirs.add_baseline("Shapes.json", &listing);

    let reloaded = Listing::from_json(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(reloaded, listing);
    assert_eq!(
        listing_fingerprint(&reloaded).unwrap(),
        listing_fingerprint(&listing).unwrap()
    );
    assert!(Comparator::new(&reloaded, &module().listing()).compare().passed());
}

#[test]
fn persisted_listing_omits_default_values() {
    let dirs = ListingDirs::new();
    let path = dirs.add_baseline("Shapes.json", &module().listing());
    let json = fs::read_to_string(path).unwrap();

    assert!(json.contains("\"AssemblyIdentity\""));
    assert!(json.contains("\"ImplementedInterface\": \"Lib.IShape\""));
    assert!(!json.contains("\"Sealed\""));
    assert!(!json.contains("\"Static\""));
    assert!(!json.contains("false"));
    assert!(!json.contains("null"));
}

#[test]
fn fact_set_document_round_trips() {
    let facts = module().build();
    let json = facts.to_json_pretty().unwrap();
    let reparsed = FactSet::from_json(&json).unwrap();

    assert_eq!(
        apicompat_core::extract_listing(&reparsed).unwrap(),
        apicompat_core::extract_listing(&facts).unwrap()
    );
}

#[test]
fn hand_edited_duplicate_is_rejected_on_load() {
    let json = r#"{
        "AssemblyIdentity": "Shapes",
        "Types": [
            {"Name": "Lib.Circle", "Visibility": "Public", "Kind": "Class"},
            {"Name": "Lib.Circle", "Visibility": "Public", "Kind": "Struct"}
        ]
    }"#;
    assert!(matches!(
        Listing::from_json(json),
        Err(SchemaError::DuplicateType(name)) if name == "Lib.Circle"
    ));
}
