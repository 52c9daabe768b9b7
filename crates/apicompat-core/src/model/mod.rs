//! Descriptor model for API surface listings.
//!
//! A [`Listing`] is an immutable snapshot of one module's public surface. Each
//! descriptor computes an `id()`: a deterministic string built only from its
//! own fields. Ids double as the human-readable rendering and as the identity
//! compared across listings.

mod generic;
mod listing;
mod member;
mod parameter;
mod type_descriptor;


use serde::{Deserialize, Serialize};

pub use generic::{GenericConstraintDescriptor, GenericParameterDescriptor};
pub use listing::Listing;
pub use member::{MemberDescriptor, MemberKind, MemberSignature};
pub use parameter::{Direction, ParameterDescriptor};
pub use type_descriptor::{TypeDescriptor, TypeKind};

/// Declared accessibility of a type or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Protected,
    Internal,
    ProtectedInternal,
    Private,
}

impl Visibility {
    /// Returns the keyword used in descriptor Ids.
    pub fn keyword(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Internal => "internal",
            Visibility::ProtectedInternal => "protected internal",
            Visibility::Private => "private",
        }
    }

    /// Returns true if code outside the declaring module can reach this
    /// symbol (directly or through derivation).
    pub fn is_externally_visible(&self) -> bool {
        matches!(
            self,
            Visibility::Public | Visibility::Protected | Visibility::ProtectedInternal
        )
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A borrowed view of any descriptor in a listing.
///
/// Filters and reporters that need to treat descriptors uniformly match on
/// this enum; adding a descriptor kind makes every such match fail to compile
/// until it is handled.
#[derive(Debug, Clone, Copy)]
pub enum Descriptor<'a> {
    Type(&'a TypeDescriptor),
    Member(&'a MemberDescriptor),
    Parameter(&'a ParameterDescriptor),
    GenericParameter(&'a GenericParameterDescriptor),
    GenericConstraint(&'a GenericConstraintDescriptor),
}

impl<'a> Descriptor<'a> {
    /// Returns the descriptor's Id.
    pub fn id(&self) -> String {
        match self {
            Descriptor::Type(t) => t.id(),
            Descriptor::Member(m) => m.id(),
            Descriptor::Parameter(p) => p.id(),
            Descriptor::GenericParameter(g) => g.id(),
            Descriptor::GenericConstraint(c) => c.id(),
        }
    }

    /// Returns the descriptor's own name.
    pub fn name(&self) -> String {
        match self {
            Descriptor::Type(t) => t.name.clone(),
            Descriptor::Member(m) => m.name.clone(),
            Descriptor::Parameter(p) => p.name.clone(),
            Descriptor::GenericParameter(g) => g.parameter_name.clone(),
            Descriptor::GenericConstraint(c) => c.label(),
        }
    }

    /// Returns a short label for the descriptor kind.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Descriptor::Type(_) => "type",
            Descriptor::Member(_) => "member",
            Descriptor::Parameter(_) => "parameter",
            Descriptor::GenericParameter(_) => "generic parameter",
            Descriptor::GenericConstraint(_) => "generic constraint",
        }
    }
}

/// Serde helper: omit `false` flags on write.
pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

/// Serde helper: omit a zero position on write.
pub(crate) fn is_zero(value: &usize) -> bool {
    *value == 0
}

/// Renders a where-clause shared by generic parameters and constraints.
///
/// Returns `None` when the parameter is unconstrained.
pub(crate) fn render_where_clause(
    label: &str,
    class: bool,
    is_struct: bool,
    bases: &[String],
    new: bool,
) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    if class {
        parts.push("class");
    }
    if is_struct {
        parts.push("struct");
    }
    parts.extend(bases.iter().map(String::as_str));
    if new {
        parts.push("new()");
    }
    if parts.is_empty() {
        None
    } else {
        Some(format!("where {} : {}", label, parts.join(", ")))
    }
}
