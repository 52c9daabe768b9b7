//! API surface extraction and comparison.
//!
//! This crate turns the symbol facts of a compiled library module into a
//! [`Listing`] (a deterministic, serializable snapshot of its public surface)
//! and compares two listings to find breaking changes.
//!
//! # Overview
//!
//! - **Extraction**: an [`Extractor`] reads a [`MetadataProvider`], applies a
//!   visibility filter, names every type reference canonically and records
//!   only directly implemented interfaces.
//! - **Comparison**: a [`Comparator`] matches types by name and members by
//!   signature, then reports removed or changed declarations as
//!   [`Violation`]s. Additions are never violations.
//!
//! # Example
//!
//! ```
//! use apicompat_core::{Comparator, Listing, MemberDescriptor, TypeDescriptor, ViolationKind};
//!
//! let baseline = Listing::new("Lib").with_type(
//!     TypeDescriptor::class("Lib.Foo")
//!         .member(MemberDescriptor::method("Bar", "System.Void"))
//!         .member(MemberDescriptor::method("Baz", "System.Void")),
//! );
//! let candidate = Listing::new("Lib").with_type(
//!     TypeDescriptor::class("Lib.Foo").member(MemberDescriptor::method("Baz", "System.Void")),
//! );
//!
//! let report = Comparator::new(&baseline, &candidate).compare();
//! assert!(!report.passed());
//! assert_eq!(report.violations[0].kind, ViolationKind::MemberRemoved);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Descriptor types and their Ids
//! - [`naming`]: Canonical type naming
//! - [`provider`]: Metadata provider interface
//! - [`fact_set`]: In-memory provider backed by a JSON fact set
//! - [`interfaces`]: Directly implemented interface resolution
//! - [`extract`]: Listing extraction
//! - [`compare`]: Listing comparison and exclusions
//! - [`validation`]: Structural checks on persisted listings
//! - [`hash`]: Listing fingerprints
//! - [`error`]: Error and violation types

pub mod compare;
pub mod error;
pub mod extract;
pub mod fact_set;
pub mod hash;
pub mod interfaces;
pub mod model;
pub mod naming;
pub mod provider;
pub mod validation;

// Re-export commonly used types at the crate root
pub use compare::{
    compare_listings, exclude_namespaces, keep_all, Comparator, ComparisonReport,
    DescriptorFilter, Exclusion, Exclusions,
};
pub use error::{ExtractionError, SchemaError, Violation, ViolationKind};
pub use extract::{extract_listing, Extractor, VisibilityFilter};
pub use fact_set::{FactSet, MemberEntry, TypeEntry};
pub use hash::listing_fingerprint;
pub use interfaces::{InterfaceResolver, VisibilityPredicate};
pub use model::{
    Descriptor, Direction, GenericConstraintDescriptor, GenericParameterDescriptor, Listing,
    MemberDescriptor, MemberKind, MemberSignature, ParameterDescriptor, TypeDescriptor, TypeKind,
    Visibility,
};
pub use naming::{canonical_name, Literal, TypeRef};
pub use provider::{
    GenericOwner, GenericParameterFacts, InterfaceSlot, MemberFacts, MemberHandle,
    MetadataProvider, ParameterFacts, TypeFacts, TypeHandle,
};
pub use validation::validate_listing;
