//! Which interfaces a type lists, checked through full extraction.

use apicompat_core::{Comparator, MemberEntry, MemberFacts, TypeEntry, Visibility};
use apicompat_tests::fixtures::{
    class, implementing_method, interface, interface_method, lib, void_method, ModuleBuilder,
};
use pretty_assertions::assert_eq;

fn base() -> TypeEntry {
    let mut base = class("Base");
    base.facts.interfaces.push(lib("IShape"));
    base.member(implementing_method("Area", lib("IShape")))
}

fn derived(name: &str) -> TypeEntry {
    let mut derived = class(name);
    derived.facts.base_type = Some(lib("Base"));
    derived.facts.interfaces.push(lib("IShape"));
    derived
}

fn type_id(module: &ModuleBuilder, name: &str) -> String {
    module
        .listing()
        .find_type(name)
        .map(|ty| ty.id())
        .unwrap_or_default()
}

#[test]
fn inherited_interface_is_not_repeated() {
    let module = ModuleBuilder::new("Shapes")
        .with(interface("IShape").member(interface_method("Area")))
        .with(base())
        .with(derived("Square").member(MemberEntry::new(void_method("Fill"))));

    assert_eq!(type_id(&module, "Lib.Base"), "public class Lib.Base : Lib.IShape");
    assert_eq!(type_id(&module, "Lib.Square"), "public class Lib.Square : Lib.Base");
}

#[test]
fn reimplemented_interface_is_listed() {
    let explicit = MemberEntry::new(MemberFacts {
        visibility: Visibility::Private,
        is_virtual: true,
        is_final: true,
        is_new_slot: true,
        explicit_interface: Some(lib("IShape")),
        ..void_method("Area")
    });
    let module = ModuleBuilder::new("Shapes")
        .with(interface("IShape").member(interface_method("Area")))
        .with(base())
        .with(derived("Square").member(explicit));

    let listing = module.listing();
    let square = listing.find_type("Lib.Square").unwrap();
    assert_eq!(square.id(), "public class Lib.Square : Lib.Base, Lib.IShape");
    assert_eq!(square.members[0].id(), "System.Void Lib.IShape.Area()");
}

#[test]
fn extended_interfaces_are_not_repeated() {
    let mut sized = interface("ISized");
    sized.facts.interfaces.push(lib("IShape"));
    let mut boxed = interface("IBoxed");
    boxed.facts.interfaces.push(lib("ISized"));
    boxed.facts.interfaces.push(lib("IShape"));
    let module = ModuleBuilder::new("Shapes")
        .with(interface("IShape"))
        .with(sized)
        .with(boxed);

    assert_eq!(
        type_id(&module, "Lib.IBoxed"),
        "public interface Lib.IBoxed : Lib.ISized"
    );
}

fn hidden() -> TypeEntry {
    let mut hidden = interface("IHidden");
    hidden.facts.visibility = Visibility::Internal;
    hidden.facts.interfaces.push(lib("IShape"));
    hidden.member(interface_method("Secret"))
}

#[test]
fn extending_through_an_internal_interface_is_unchanged() {
    let mut direct = interface("ICircle");
    direct.facts.interfaces.push(lib("IShape"));
    let baseline = ModuleBuilder::new("Shapes, Version=1.0.0.0")
        .with(interface("IShape"))
        .with(direct);

    let mut routed = interface("ICircle");
    routed.facts.interfaces.push(lib("IHidden"));
    routed.facts.interfaces.push(lib("IShape"));
    let candidate = ModuleBuilder::new("Shapes, Version=2.0.0.0")
        .with(interface("IShape"))
        .with(hidden())
        .with(routed);

    assert_eq!(
        type_id(&candidate, "Lib.ICircle"),
        "public interface Lib.ICircle : Lib.IShape"
    );
    let report = Comparator::new(&baseline.listing(), &candidate.listing()).compare();
    assert_eq!(report.violations, Vec::new());
}

#[test]
fn explicit_implementation_of_internal_interface_is_omitted() {
    let secret = MemberEntry::new(MemberFacts {
        visibility: Visibility::Private,
        is_virtual: true,
        is_final: true,
        is_new_slot: true,
        explicit_interface: Some(lib("IHidden")),
        ..void_method("Secret")
    });
    let mut circle = class("Circle");
    circle.facts.interfaces.push(lib("IHidden"));
    let module = ModuleBuilder::new("Shapes")
        .with(interface("IShape"))
        .with(hidden())
        .with(circle.member(secret));

    let listing = module.listing();
    let circle = listing.find_type("Lib.Circle").unwrap();
    assert_eq!(circle.id(), "public class Lib.Circle : Lib.IShape");
    assert!(circle.members.is_empty());
    assert!(listing.find_type("Lib.IHidden").is_none());
}
