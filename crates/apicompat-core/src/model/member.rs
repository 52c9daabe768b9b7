//! Member descriptors: constructors, methods and fields.

use serde::{Deserialize, Serialize};

use super::{is_false, Direction, GenericConstraintDescriptor, ParameterDescriptor, Visibility};

/// Kind of member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MemberKind {
    Constructor,
    Method,
    Field,
}

impl std::fmt::Display for MemberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberKind::Constructor => write!(f, "constructor"),
            MemberKind::Method => write!(f, "method"),
            MemberKind::Field => write!(f, "field"),
        }
    }
}

/// A member of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MemberDescriptor {
    pub kind: MemberKind,

    /// Simple name; generic methods include their parameter list (`Map<TResult>`).
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDescriptor>,

    /// Return type for methods, field type for fields, absent for constructors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub sealed: bool,

    #[serde(default, rename = "Static", skip_serializing_if = "is_false")]
    pub is_static: bool,

    #[serde(default, rename = "Virtual", skip_serializing_if = "is_false")]
    pub is_virtual: bool,

    #[serde(default, rename = "Override", skip_serializing_if = "is_false")]
    pub is_override: bool,

    #[serde(default, rename = "Abstract", skip_serializing_if = "is_false")]
    pub is_abstract: bool,

    /// Hides an inherited member of the same signature.
    #[serde(default, skip_serializing_if = "is_false")]
    pub new: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub extension: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,

    /// Interface named by an explicit implementation (`IFoo.Bar`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_interface: Option<String>,

    /// Interface whose slot this member fills implicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implemented_interface: Option<String>,

    /// Absent for explicit interface implementations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_constraints: Vec<GenericConstraintDescriptor>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub constant: bool,

    /// Rendered value of a `const` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
}

impl MemberDescriptor {
    /// Creates a member with no modifiers.
    pub fn new(kind: MemberKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            parameters: Vec::new(),
            return_type: None,
            sealed: false,
            is_static: false,
            is_virtual: false,
            is_override: false,
            is_abstract: false,
            new: false,
            extension: false,
            read_only: false,
            explicit_interface: None,
            implemented_interface: None,
            visibility: None,
            generic_constraints: Vec::new(),
            constant: false,
            literal: None,
        }
    }

    /// Creates a public method.
    pub fn method(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        let mut member = Self::new(MemberKind::Method, name);
        member.return_type = Some(return_type.into());
        member.visibility = Some(Visibility::Public);
        member
    }

    /// Creates a public instance constructor.
    pub fn constructor() -> Self {
        let mut member = Self::new(MemberKind::Constructor, ".ctor");
        member.visibility = Some(Visibility::Public);
        member
    }

    /// Creates a public field.
    pub fn field(name: impl Into<String>, ty: impl Into<String>) -> Self {
        let mut member = Self::new(MemberKind::Field, name);
        member.return_type = Some(ty.into());
        member.visibility = Some(Visibility::Public);
        member
    }

    /// Sets the visibility.
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Adds a parameter.
    pub fn parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Turns the member into an explicit implementation of `interface`.
    pub fn explicit(mut self, interface: impl Into<String>) -> Self {
        self.explicit_interface = Some(interface.into());
        self.visibility = None;
        self
    }

    /// Name as it appears in Ids and signatures (`IFoo.Bar` for explicit implementations).
    pub fn qualified_name(&self) -> String {
        match self.explicit_interface {
            Some(ref interface) => format!("{}.{}", interface, self.name),
            None => self.name.clone(),
        }
    }

    /// Modifier-independent signature used to pair members across listings.
    pub fn signature(&self) -> MemberSignature {
        MemberSignature {
            kind: self.kind,
            name: self.qualified_name(),
            parameters: self
                .parameters
                .iter()
                .map(|p| (p.direction, p.ty.clone()))
                .collect(),
        }
    }

    /// Full declaration string, including modifiers and return type.
    pub fn id(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if self.explicit_interface.is_none() {
            if let Some(visibility) = self.visibility {
                parts.push(visibility.keyword().to_string());
            }
        }

        let modifiers = [
            (self.is_static, "static"),
            (self.is_abstract, "abstract"),
            (self.is_virtual, "virtual"),
            (self.is_override, "override"),
            (self.sealed, "sealed"),
            (self.new, "new"),
            (self.constant, "const"),
            (self.read_only && !self.constant, "readonly"),
        ];
        parts.extend(
            modifiers
                .iter()
                .filter(|(set, _)| *set)
                .map(|(_, keyword)| keyword.to_string()),
        );

        match self.kind {
            MemberKind::Field => {
                if let Some(ref ty) = self.return_type {
                    parts.push(ty.clone());
                }
                let mut declaration = self.name.clone();
                if let Some(ref literal) = self.literal {
                    declaration.push_str(" = ");
                    declaration.push_str(literal);
                }
                parts.push(declaration);
            }
            MemberKind::Constructor | MemberKind::Method => {
                if let Some(ref ty) = self.return_type {
                    parts.push(ty.clone());
                }
                parts.push(format!("{}({})", self.qualified_name(), self.parameter_list()));
                parts.extend(
                    self.generic_constraints
                        .iter()
                        .filter(|c| c.has_constraints())
                        .map(|c| c.id()),
                );
            }
        }

        parts.join(" ")
    }

    fn parameter_list(&self) -> String {
        self.parameters
            .iter()
            .enumerate()
            .map(|(i, p)| {
                if i == 0 && self.extension {
                    format!("this {}", p.id())
                } else {
                    p.id()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The part of a member that identifies it regardless of modifiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberSignature {
    pub kind: MemberKind,
    pub name: String,
    pub parameters: Vec<(Direction, String)>,
}

impl std::fmt::Display for MemberSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|(direction, ty)| format!("{}{}", direction.prefix(), ty))
            .collect();
        write!(f, "{} {}({})", self.kind, self.name, params.join(", "))
    }
}
