//! The listing: a module's API surface snapshot.

use serde::{Deserialize, Serialize};

use super::TypeDescriptor;
use crate::error::SchemaError;
use crate::validation::validate_listing;

/// All exported types of one module, sorted by Id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Listing {
    /// Identity of the module the listing was extracted from.
    pub assembly_identity: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<TypeDescriptor>,
}

impl Listing {
    /// Creates an empty listing.
    pub fn new(assembly_identity: impl Into<String>) -> Self {
        Self {
            assembly_identity: assembly_identity.into(),
            types: Vec::new(),
        }
    }

    /// Adds a type. Call [`Listing::sort`] afterwards to restore Id order.
    pub fn with_type(mut self, ty: TypeDescriptor) -> Self {
        self.types.push(ty);
        self
    }

    /// Sorts types and each type's members by Id.
    pub fn sort(&mut self) {
        for ty in &mut self.types {
            ty.members.sort_by_cached_key(|m| m.id());
        }
        self.types.sort_by_cached_key(|t| t.id());
    }

    /// Parses and validates a persisted listing.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let listing: Listing = serde_json::from_str(json)?;
        validate_listing(&listing)?;
        Ok(listing)
    }

    /// Parses and validates a listing from a JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, SchemaError> {
        let listing: Listing = serde_json::from_value(value)?;
        validate_listing(&listing)?;
        Ok(listing)
    }

    /// Serializes the listing to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the listing to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serializes the listing to a JSON value.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Finds a type by canonical name.
    pub fn find_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Total number of members across all types.
    pub fn member_count(&self) -> usize {
        self.types.iter().map(|t| t.members.len()).sum()
    }
}
