//! Metadata provider interface.
//!
//! The extractor never reads binary modules itself. It asks a
//! [`MetadataProvider`] for plain symbol facts: which types a module exports,
//! their members, parameters and generic parameters, plus two queries needed
//! for interface resolution ([`MetadataProvider::resolve`] and
//! [`MetadataProvider::interface_map`]). Adapters for concrete binary formats
//! implement the trait; [`crate::fact_set::FactSet`] is the in-memory
//! implementation used by the CLI and tests.

use serde::{Deserialize, Serialize};

use crate::model::{MemberKind, TypeKind, Visibility};
use crate::naming::{Literal, TypeRef};

/// Opaque handle to a type known to a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeHandle(pub u32);

impl std::fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle to a member of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MemberHandle {
    pub owner: TypeHandle,
    pub index: u32,
}

/// Declarer of a generic parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericOwner {
    Type(TypeHandle),
    Method(MemberHandle),
}

/// Facts about one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeFacts {
    /// Self reference; generic definitions carry their own parameters as arguments.
    pub reference: TypeRef,
    pub visibility: Visibility,
    pub kind: TypeKind,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_sealed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<TypeRef>,
    /// Interfaces named in the type's own declaration, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<TypeRef>,
}

/// Facts about one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberFacts {
    pub kind: MemberKind,
    /// Simple name; explicit implementations use the interface member's name.
    pub name: String,
    pub visibility: Visibility,
    /// Method return type or field type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeRef>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub is_abstract: bool,
    /// Virtual method that cannot be overridden further.
    #[serde(default)]
    pub is_final: bool,
    /// Virtual method that opens a new vtable slot instead of overriding.
    #[serde(default)]
    pub is_new_slot: bool,
    /// Hides an inherited member with the same signature.
    #[serde(default)]
    pub hides_base: bool,
    #[serde(default)]
    pub is_extension: bool,
    /// `readonly` field.
    #[serde(default)]
    pub is_init_only: bool,
    /// Value of a `const` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<Literal>,
    /// Interface of an explicit implementation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_interface: Option<TypeRef>,
    /// Interfaces whose slots this member fills implicitly.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<TypeRef>,
}

impl MemberFacts {
    /// Creates facts for a public, non-virtual member.
    pub fn new(kind: MemberKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            visibility: Visibility::Public,
            return_type: None,
            is_static: false,
            is_virtual: false,
            is_abstract: false,
            is_final: false,
            is_new_slot: false,
            hides_base: false,
            is_extension: false,
            is_init_only: false,
            literal: None,
            explicit_interface: None,
            implements: Vec::new(),
        }
    }
}

/// Facts about one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterFacts {
    pub name: String,
    /// Parameter type; `ref`/`out` parameters use a by-ref type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Distinguishes `out` from `ref` for by-ref parameters.
    #[serde(default)]
    pub is_out: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Literal>,
    #[serde(default)]
    pub is_params: bool,
}

impl ParameterFacts {
    /// Creates facts for a by-value parameter.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            is_out: false,
            default_value: None,
            is_params: false,
        }
    }
}

/// Facts about one generic parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericParameterFacts {
    pub name: String,
    pub position: usize,
    /// `new()` constraint.
    #[serde(default)]
    pub default_constructor: bool,
    /// `class` constraint.
    #[serde(default)]
    pub reference_type: bool,
    /// `struct` constraint.
    #[serde(default)]
    pub value_type: bool,
    /// Type constraints: at most one class bound plus any interfaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<TypeRef>,
}

impl GenericParameterFacts {
    /// Creates facts for an unconstrained parameter.
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
            default_constructor: false,
            reference_type: false,
            value_type: false,
            constraints: Vec::new(),
        }
    }
}

/// One resolved interface slot: which member satisfies an interface member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceSlot {
    /// Name of the interface member.
    pub interface_member: String,
    /// The implementing member; `implementation.owner` is its declaring type.
    pub implementation: MemberHandle,
}

/// Source of symbol facts for one module and its dependency closure.
pub trait MetadataProvider {
    /// Identity of the module being described.
    fn assembly_identity(&self) -> &str;

    /// Types defined in the module, in metadata order. Dependency types are
    /// reachable through [`MetadataProvider::resolve`] but are not listed.
    fn list_types(&self) -> Vec<TypeHandle>;

    /// Facts for any type the provider knows, module or dependency.
    fn type_facts(&self, ty: TypeHandle) -> Option<&TypeFacts>;

    /// Members declared directly on a type.
    fn list_members(&self, ty: TypeHandle) -> Vec<MemberHandle>;

    /// Facts for a member.
    fn member_facts(&self, member: MemberHandle) -> Option<&MemberFacts>;

    /// Parameters of a method or constructor, in order.
    fn list_parameters(&self, member: MemberHandle) -> &[ParameterFacts];

    /// Generic parameters of a type (including enclosing types' parameters
    /// for nested types) or of a method.
    fn list_generic_parameters(&self, owner: GenericOwner) -> &[GenericParameterFacts];

    /// Finds the definition behind a reference, ignoring generic arguments.
    fn resolve(&self, reference: &TypeRef) -> Option<TypeHandle>;

    /// Slots of `interface` as implemented by `ty`, resolved to the most
    /// derived implementing members.
    fn interface_map(&self, ty: TypeHandle, interface: &TypeRef) -> Vec<InterfaceSlot>;
}
