//! Test fixture utilities for building fact sets and listing trees.

use std::fs;
use std::path::{Path, PathBuf};

use apicompat_core::{
    extract_listing, FactSet, Listing, MemberEntry, MemberFacts, MemberKind, ParameterFacts,
    TypeEntry, TypeFacts, TypeKind, TypeRef, Visibility,
};
use tempfile::TempDir;

/// Namespace every fixture type lives in.
pub const FIXTURE_NAMESPACE: &str = "Lib";

/// Reference to a fixture type.
pub fn lib(name: &str) -> TypeRef {
    TypeRef::named(FIXTURE_NAMESPACE, name)
}

/// Reference to a core library type.
pub fn system(name: &str) -> TypeRef {
    TypeRef::named("System", name)
}

/// Facts for a public type with the implicit base its kind requires.
pub fn type_facts(reference: TypeRef, kind: TypeKind) -> TypeFacts {
    TypeFacts {
        reference,
        visibility: Visibility::Public,
        kind,
        is_abstract: false,
        is_sealed: false,
        base_type: match kind {
            TypeKind::Class => Some(system("Object")),
            TypeKind::Struct => Some(system("ValueType")),
            TypeKind::Enumeration => Some(system("Enum")),
            TypeKind::Interface => None,
        },
        interfaces: Vec::new(),
    }
}

/// A public class in the fixture namespace.
pub fn class(name: &str) -> TypeEntry {
    TypeEntry::new(type_facts(lib(name), TypeKind::Class))
}

/// A public interface in the fixture namespace.
pub fn interface(name: &str) -> TypeEntry {
    TypeEntry::new(type_facts(lib(name), TypeKind::Interface))
}

/// Facts for a public method returning `System.Void`.
pub fn void_method(name: &str) -> MemberFacts {
    let mut facts = MemberFacts::new(MemberKind::Method, name);
    facts.return_type = Some(system("Void"));
    facts
}

/// A public instance constructor taking the given `(name, type)` parameters.
pub fn constructor(parameters: &[(&str, TypeRef)]) -> MemberEntry {
    parameters.iter().fold(
        MemberEntry::new(MemberFacts::new(MemberKind::Constructor, ".ctor")),
        |entry, (name, ty)| entry.parameter(ParameterFacts::new(*name, ty.clone())),
    )
}

/// An abstract interface method.
pub fn interface_method(name: &str) -> MemberEntry {
    MemberEntry::new(MemberFacts {
        is_virtual: true,
        is_abstract: true,
        is_new_slot: true,
        ..void_method(name)
    })
}

/// A method implicitly implementing `iface`.
pub fn implementing_method(name: &str, iface: TypeRef) -> MemberEntry {
    MemberEntry::new(MemberFacts {
        is_virtual: true,
        is_final: true,
        is_new_slot: true,
        implements: vec![iface],
        ..void_method(name)
    })
}

/// Builds one version of a module's facts on top of the core dependency types.
pub struct ModuleBuilder {
    facts: FactSet,
}

impl ModuleBuilder {
    /// Creates a module that already resolves the core types.
    pub fn new(assembly_identity: &str) -> Self {
        let mut facts = FactSet::new(assembly_identity);
        for name in ["Object", "ValueType", "Enum", "Void", "String"] {
            facts.add_dependency(TypeEntry::new(TypeFacts {
                base_type: None,
                ..type_facts(system(name), TypeKind::Class)
            }));
        }
        for name in ["Int32", "Int64", "Double", "Boolean"] {
            facts.add_dependency(TypeEntry::new(type_facts(system(name), TypeKind::Struct)));
        }
        Self { facts }
    }

    /// Adds a module type.
    pub fn with(mut self, entry: TypeEntry) -> Self {
        self.facts.add_type(entry);
        self
    }

    /// Returns the collected facts.
    pub fn build(self) -> FactSet {
        self.facts
    }

    /// Extracts the module's listing.
    ///
    /// # Panics
    ///
    /// Panics if extraction fails.
    pub fn listing(&self) -> Listing {
        extract_listing(&self.facts).expect("fixture facts should extract")
    }
}

/// Baseline and candidate listing directories, laid out the way the batch
/// command expects them.
pub struct ListingDirs {
    pub root: TempDir,
    pub baseline: PathBuf,
    pub candidate: PathBuf,
}

impl Default for ListingDirs {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingDirs {
    /// Creates empty `baseline/` and `candidate/` directories.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let baseline = root.path().join("baseline");
        let candidate = root.path().join("candidate");
        fs::create_dir_all(&baseline).expect("Failed to create baseline dir");
        fs::create_dir_all(&candidate).expect("Failed to create candidate dir");
        Self {
            root,
            baseline,
            candidate,
        }
    }

    /// Writes a baseline listing at `relative`.
    pub fn add_baseline(&self, relative: &str, listing: &Listing) -> PathBuf {
        write_listing(&self.baseline, relative, listing)
    }

    /// Writes a candidate listing at `relative`.
    pub fn add_candidate(&self, relative: &str, listing: &Listing) -> PathBuf {
        write_listing(&self.candidate, relative, listing)
    }

    /// Get the root path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }
}

fn write_listing(dir: &Path, relative: &str, listing: &Listing) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create listing dir");
    }
    let json = listing.to_json_pretty().expect("Failed to serialize listing");
    fs::write(&path, json).expect("Failed to write listing");
    path
}
