//! Determinism tests for listing extraction.
//!
//! Listings are committed next to the code they describe, so repeated
//! extraction must be byte-identical and independent of metadata order.

use apicompat_core::{extract_listing, listing_fingerprint, MemberEntry, TypeEntry};
use apicompat_tests::fixtures::{
    class, constructor, implementing_method, interface, interface_method, lib, system,
    void_method, ModuleBuilder,
};
use apicompat_tests::verify_determinism;
use pretty_assertions::assert_eq;

fn types() -> Vec<TypeEntry> {
    let mut task = class("Task");
    task.facts.interfaces.push(lib("IRunnable"));
    vec![
        class("Zeta").member(MemberEntry::new(void_method("Omega"))),
        interface("IRunnable").member(interface_method("Run")),
        task.member(implementing_method("Run", lib("IRunnable")))
            .member(MemberEntry::new(void_method("Cancel")))
            .member(constructor(&[("name", system("String")), ("retries", system("Int32"))])),
        class("Alpha"),
    ]
}

fn module(entries: Vec<TypeEntry>) -> ModuleBuilder {
    entries
        .into_iter()
        .fold(ModuleBuilder::new("Tasks"), |module, entry| module.with(entry))
}

#[test]
fn repeated_extraction_is_byte_identical() {
    let facts = module(types()).build();
    let result = verify_determinism(
        || extract_listing(&facts).unwrap().to_json_pretty().unwrap(),
        5,
    );
    result.assert_deterministic();
}

#[test]
fn metadata_order_does_not_change_the_listing() {
    let forward = module(types()).listing();
    let mut reversed_types = types();
    reversed_types.reverse();
    for entry in &mut reversed_types {
        entry.members.reverse();
    }
    let reversed = module(reversed_types).listing();

    assert_eq!(forward.to_json().unwrap(), reversed.to_json().unwrap());
    assert_eq!(
        listing_fingerprint(&forward).unwrap(),
        listing_fingerprint(&reversed).unwrap()
    );
}

#[test]
fn listing_is_sorted_by_id() {
    let listing = module(types()).listing();
    let ids: Vec<String> = listing.types.iter().map(|t| t.id()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);

    for ty in &listing.types {
        let member_ids: Vec<String> = ty.members.iter().map(|m| m.id()).collect();
        let mut sorted = member_ids.clone();
        sorted.sort();
        assert_eq!(member_ids, sorted, "members of {} are not sorted", ty.name);
    }
}
