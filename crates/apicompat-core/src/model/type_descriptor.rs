//! Type descriptors.

use serde::{Deserialize, Serialize};

use super::{is_false, GenericParameterDescriptor, MemberDescriptor, Visibility};

/// Kind of type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Struct,
    Interface,
    Class,
    Enumeration,
}

impl TypeKind {
    /// Returns the keyword used in Ids.
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
            TypeKind::Class => "class",
            TypeKind::Enumeration => "enum",
        }
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One exported type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TypeDescriptor {
    /// Canonical name, unique within a listing.
    pub name: String,

    pub visibility: Visibility,

    pub kind: TypeKind,

    #[serde(default, rename = "Abstract", skip_serializing_if = "is_false")]
    pub is_abstract: bool,

    #[serde(default, rename = "Static", skip_serializing_if = "is_false")]
    pub is_static: bool,

    #[serde(default, rename = "Sealed", skip_serializing_if = "is_false")]
    pub is_sealed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,

    /// Directly implemented interfaces, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implemented_interfaces: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_parameters: Vec<GenericParameterDescriptor>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberDescriptor>,
}

impl TypeDescriptor {
    /// Creates a type with no modifiers, base type or members.
    pub fn new(name: impl Into<String>, visibility: Visibility, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            visibility,
            kind,
            is_abstract: false,
            is_static: false,
            is_sealed: false,
            base_type: None,
            implemented_interfaces: Vec::new(),
            generic_parameters: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Creates a public class.
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, Visibility::Public, TypeKind::Class)
    }

    /// Creates a public interface.
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, Visibility::Public, TypeKind::Interface)
    }

    /// Adds a member.
    pub fn member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(member);
        self
    }

    /// Sets the base type.
    pub fn base(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = Some(base_type.into());
        self
    }

    /// Adds a directly implemented interface.
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.implemented_interfaces.push(interface.into());
        self
    }

    /// Namespace prefix of the canonical name (text before the last `.`
    /// outside any generic argument list).
    pub fn namespace(&self) -> Option<&str> {
        let mut depth = 0usize;
        let mut split = None;
        for (i, c) in self.name.char_indices() {
            match c {
                '<' => depth += 1,
                '>' => depth = depth.saturating_sub(1),
                '+' if depth == 0 => break,
                '.' if depth == 0 => split = Some(i),
                _ => {}
            }
        }
        split.map(|i| &self.name[..i])
    }

    /// Declaration string, excluding members.
    pub fn id(&self) -> String {
        let mut id = String::from(self.visibility.keyword());

        if self.is_static {
            id.push_str(" static");
        } else {
            if self.is_abstract && self.kind != TypeKind::Interface {
                id.push_str(" abstract");
            }
            if self.is_sealed && self.kind == TypeKind::Class {
                id.push_str(" sealed");
            }
        }

        id.push(' ');
        id.push_str(self.kind.keyword());
        id.push(' ');
        id.push_str(&self.name);

        let supertypes: Vec<&str> = self
            .base_type
            .iter()
            .chain(self.implemented_interfaces.iter())
            .map(String::as_str)
            .collect();
        if !supertypes.is_empty() {
            id.push_str(" : ");
            id.push_str(&supertypes.join(", "));
        }

        for parameter in self.generic_parameters.iter().filter(|p| p.has_constraints()) {
            id.push(' ');
            id.push_str(&parameter.id());
        }

        id
    }

    /// Finds a member by its full Id.
    pub fn find_member(&self, id: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.id() == id)
    }
}
