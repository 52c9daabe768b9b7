//! Structural validation of persisted listings.
//!
//! Deserialization already enforces required fields and enum spellings; this
//! pass enforces the invariants serde cannot express.

use std::collections::HashSet;

use crate::error::SchemaError;
use crate::model::{Listing, TypeKind};

/// Validates a listing, stopping at the first problem.
///
/// # Example
/// ```
/// use apicompat_core::model::{Listing, TypeDescriptor};
/// use apicompat_core::validation::validate_listing;
///
/// let listing = Listing::new("Lib, Version=1.0.0.0")
///     .with_type(TypeDescriptor::class("Lib.Foo"))
///     .with_type(TypeDescriptor::class("Lib.Foo"));
///
/// assert!(validate_listing(&listing).is_err());
/// ```
pub fn validate_listing(listing: &Listing) -> Result<(), SchemaError> {
    let mut names = HashSet::new();

    for (index, ty) in listing.types.iter().enumerate() {
        if ty.name.is_empty() {
            return Err(SchemaError::EmptyTypeName(index));
        }
        if !names.insert(ty.name.as_str()) {
            return Err(SchemaError::DuplicateType(ty.name.clone()));
        }
        if ty.kind == TypeKind::Interface && ty.is_sealed {
            return Err(SchemaError::SealedInterface(ty.name.clone()));
        }
        if ty.is_static && ty.kind != TypeKind::Class {
            return Err(SchemaError::StaticNonClass(ty.name.clone()));
        }

        let mut member_ids = HashSet::new();
        for (member_index, member) in ty.members.iter().enumerate() {
            if member.name.is_empty() {
                return Err(SchemaError::EmptyMemberName {
                    type_name: ty.name.clone(),
                    index: member_index,
                });
            }
            let id = member.id();
            if !member_ids.insert(id.clone()) {
                return Err(SchemaError::DuplicateMember {
                    type_name: ty.name.clone(),
                    member_id: id,
                });
            }
        }
    }

    Ok(())
}
