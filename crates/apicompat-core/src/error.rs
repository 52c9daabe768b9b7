//! Error and violation types.
//!
//! Fatal conditions are `Err` values ([`ExtractionError`], [`SchemaError`]).
//! Detected incompatibilities are [`Violation`] records: plain data that a
//! comparison always returns in full, never an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::TypeHandle;

/// Extraction could not produce a listing for a module.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// A construct survived visibility filtering but has no stable name
    /// (closure classes, backing fields, anonymous types).
    #[error("cannot assign a deterministic Id to {construct} `{name}` (in {context})")]
    UnnamedConstruct {
        construct: &'static str,
        name: String,
        context: String,
    },

    /// The provider listed a handle it cannot describe.
    #[error("metadata provider has no facts for type handle {0}")]
    UnknownType(TypeHandle),

    /// Two exported types canonicalize to the same name.
    #[error("duplicate type name `{0}` in listing")]
    DuplicateType(String),
}

/// A persisted listing is malformed.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// JSON parsing error, including missing required fields and unknown enum values.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two types share a name.
    #[error("duplicate type name `{0}`")]
    DuplicateType(String),

    /// A type has an empty name.
    #[error("type at index {0} has an empty name")]
    EmptyTypeName(usize),

    /// A member has an empty name.
    #[error("member at index {index} of `{type_name}` has an empty name")]
    EmptyMemberName { type_name: String, index: usize },

    /// Two members of one type render to the same Id.
    #[error("duplicate member `{member_id}` in `{type_name}`")]
    DuplicateMember { type_name: String, member_id: String },

    /// An interface carries the `sealed` flag.
    #[error("interface `{0}` cannot be sealed")]
    SealedInterface(String),

    /// A non-class type carries the `static` flag.
    #[error("`{0}` is static but is not a class")]
    StaticNonClass(String),
}

/// Category of a detected incompatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// AC001: a baseline type has no candidate type of the same name.
    TypeRemoved,
    /// AC002: a matched type's declaration changed.
    TypeChanged,
    /// AC003: a baseline member has no candidate member with the same signature.
    MemberRemoved,
    /// AC004: a matched member's declaration changed.
    MemberChanged,
}

impl ViolationKind {
    /// Returns the violation code string (e.g., "AC001").
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::TypeRemoved => "AC001",
            ViolationKind::TypeChanged => "AC002",
            ViolationKind::MemberRemoved => "AC003",
            ViolationKind::MemberChanged => "AC004",
        }
    }

    /// Every violation kind describes a breaking change.
    pub fn is_breaking(&self) -> bool {
        true
    }

    /// Returns the kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::TypeRemoved => "TypeRemoved",
            ViolationKind::TypeChanged => "TypeChanged",
            ViolationKind::MemberRemoved => "MemberRemoved",
            ViolationKind::MemberChanged => "MemberChanged",
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A detected incompatibility between a baseline and a candidate listing.
///
/// Field order is the sort order: type Id, then member Id (type-level
/// violations first), then kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Violation {
    /// Id of the baseline type.
    pub type_id: String,
    /// Id of the baseline member, absent for type-level violations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    pub kind: ViolationKind,
    pub description: String,
}

impl Violation {
    /// Creates a type-level violation.
    pub fn new(
        kind: ViolationKind,
        type_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            type_id: type_id.into(),
            member_id: None,
            kind,
            description: description.into(),
        }
    }

    /// Creates a member-level violation.
    pub fn with_member(
        kind: ViolationKind,
        type_id: impl Into<String>,
        member_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            type_id: type_id.into(),
            member_id: Some(member_id.into()),
            kind,
            description: description.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.kind.as_str(), self.description)
    }
}
