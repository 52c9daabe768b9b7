//! Canonical type naming.
//!
//! Every type reference that ends up in a listing goes through
//! [`canonical_name`]. The resulting string is both the human-readable form and
//! the identity used to match descriptors across listings, so the mapping must
//! be a pure function of the [`TypeRef`]:
//!
//! - generic parameters render as their declared name
//! - `System.Nullable`1` instantiations render as `U?`
//! - other instantiations render as `Ns.Open<A, B>` (arity marker stripped)
//! - nested types render as `Outer<A>+Inner<B>`, where the nested level only
//!   lists the arguments it introduces
//! - arrays render as `T[]` (`T[,]` for rank 2), pointers as `T*`
//! - by-ref markers are dropped; direction lives on the parameter instead

use std::fmt::Write;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Namespace of the nullable value wrapper.
pub const NULLABLE_NAMESPACE: &str = "System";

/// Metadata name of the nullable value wrapper.
pub const NULLABLE_NAME: &str = "Nullable`1";

/// Names the compiler invents for closures, iterators, backing fields and
/// similar constructs. None of them can be given a stable Id.
const SYNTHESIZED_NAME_PATTERN: &str = r"^$|[<>]";

static SYNTHESIZED_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn synthesized_name_regex() -> &'static Regex {
    SYNTHESIZED_NAME_REGEX
        .get_or_init(|| Regex::new(SYNTHESIZED_NAME_PATTERN).expect("invalid regex pattern"))
}

/// A raw reference to a type, as reported by a metadata provider.
///
/// `Named::generic_arguments` follows the runtime convention: a nested type
/// carries the arguments of all its enclosing types first, followed by its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    /// A (possibly generic, possibly nested) named type.
    Named {
        /// Namespace; absent for nested types and the global namespace.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
        /// Metadata name, including an arity marker such as `` List`1 ``.
        name: String,
        /// Enclosing type for nested types.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        declaring_type: Option<Box<TypeRef>>,
        /// Generic arguments, enclosing types' arguments first.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        generic_arguments: Vec<TypeRef>,
    },
    /// A generic parameter of a type or a method.
    GenericParameter {
        name: String,
        position: usize,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        is_method: bool,
    },
    /// An array of `element`.
    Array {
        element: Box<TypeRef>,
        #[serde(default = "default_rank")]
        rank: u32,
    },
    /// A managed reference (`ref`/`out`/`in` parameter types).
    ByRef { element: Box<TypeRef> },
    /// An unmanaged pointer.
    Pointer { element: Box<TypeRef> },
}

fn default_rank() -> u32 {
    1
}

impl TypeRef {
    /// Creates a non-generic reference to `namespace.name`.
    pub fn named(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let namespace = namespace.into();
        TypeRef::Named {
            namespace: (!namespace.is_empty()).then_some(namespace),
            name: name.into(),
            declaring_type: None,
            generic_arguments: Vec::new(),
        }
    }

    /// Creates a reference to a type nested inside `declaring`.
    pub fn nested(declaring: TypeRef, name: impl Into<String>) -> Self {
        TypeRef::Named {
            namespace: None,
            name: name.into(),
            declaring_type: Some(Box::new(declaring)),
            generic_arguments: Vec::new(),
        }
    }

    /// Creates a type-level generic parameter reference.
    pub fn generic_parameter(name: impl Into<String>, position: usize) -> Self {
        TypeRef::GenericParameter {
            name: name.into(),
            position,
            is_method: false,
        }
    }

    /// Creates a method-level generic parameter reference.
    pub fn method_parameter(name: impl Into<String>, position: usize) -> Self {
        TypeRef::GenericParameter {
            name: name.into(),
            position,
            is_method: true,
        }
    }

    /// Returns a copy of this reference with the given generic arguments.
    ///
    /// Non-named references are returned unchanged.
    pub fn with_arguments(&self, arguments: Vec<TypeRef>) -> Self {
        match self {
            TypeRef::Named {
                namespace,
                name,
                declaring_type,
                ..
            } => TypeRef::Named {
                namespace: namespace.clone(),
                name: name.clone(),
                declaring_type: declaring_type.clone(),
                generic_arguments: arguments,
            },
            other => other.clone(),
        }
    }

    /// Wraps this reference in a single-dimensional array.
    pub fn array_of(self) -> Self {
        TypeRef::Array {
            element: Box::new(self),
            rank: 1,
        }
    }

    /// Wraps this reference in a managed reference.
    pub fn by_ref(self) -> Self {
        TypeRef::ByRef {
            element: Box::new(self),
        }
    }

    /// Wraps this reference in an unmanaged pointer.
    pub fn pointer_to(self) -> Self {
        TypeRef::Pointer {
            element: Box::new(self),
        }
    }

    /// Returns true for managed references.
    pub fn is_by_ref(&self) -> bool {
        matches!(self, TypeRef::ByRef { .. })
    }

    /// Returns the referenced type with any by-ref marker removed.
    pub fn without_by_ref(&self) -> &TypeRef {
        match self {
            TypeRef::ByRef { element } => element.without_by_ref(),
            other => other,
        }
    }

    /// Returns the generic arguments of a named reference.
    pub fn generic_arguments(&self) -> &[TypeRef] {
        match self {
            TypeRef::Named {
                generic_arguments, ..
            } => generic_arguments,
            _ => &[],
        }
    }

    /// Number of generic parameters the named type declares, counting the
    /// parameters of its enclosing types.
    pub fn total_arity(&self) -> usize {
        match self {
            TypeRef::Named {
                name,
                declaring_type,
                ..
            } => {
                let enclosing = declaring_type.as_ref().map_or(0, |d| d.total_arity());
                enclosing + own_arity(name)
            }
            _ => 0,
        }
    }

    /// Identity of the generic type definition behind this reference,
    /// ignoring generic arguments. `None` for non-named references.
    ///
    /// `List<int>` and `List<T>` share the key ``System.Collections.Generic.List`1``.
    pub fn definition_key(&self) -> Option<String> {
        match self {
            TypeRef::Named {
                namespace,
                name,
                declaring_type,
                ..
            } => {
                let mut key = String::new();
                if let Some(declaring) = declaring_type {
                    key.push_str(&declaring.definition_key()?);
                    key.push('+');
                } else if let Some(ns) = namespace.as_deref().filter(|ns| !ns.is_empty()) {
                    key.push_str(ns);
                    key.push('.');
                }
                key.push_str(name);
                Some(key)
            }
            _ => None,
        }
    }

    /// Namespace of the outermost declaring type.
    pub fn namespace(&self) -> Option<&str> {
        match self {
            TypeRef::Named {
                namespace,
                declaring_type,
                ..
            } => match declaring_type {
                Some(declaring) => declaring.namespace(),
                None => namespace.as_deref(),
            },
            TypeRef::Array { element, .. }
            | TypeRef::ByRef { element }
            | TypeRef::Pointer { element } => element.namespace(),
            TypeRef::GenericParameter { .. } => None,
        }
    }

    /// Replaces type-level generic parameters with `arguments[position]`.
    ///
    /// Used to view a base type's interfaces through the base type's actual
    /// instantiation (`class Foo : Base<int>` sees `IBar<T>` as `IBar<int>`).
    pub fn substitute(&self, arguments: &[TypeRef]) -> TypeRef {
        if arguments.is_empty() {
            return self.clone();
        }
        match self {
            TypeRef::GenericParameter {
                position,
                is_method: false,
                ..
            } => arguments
                .get(*position)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            TypeRef::GenericParameter { .. } => self.clone(),
            TypeRef::Named {
                namespace,
                name,
                declaring_type,
                generic_arguments,
            } => TypeRef::Named {
                namespace: namespace.clone(),
                name: name.clone(),
                declaring_type: declaring_type.clone(),
                generic_arguments: generic_arguments
                    .iter()
                    .map(|arg| arg.substitute(arguments))
                    .collect(),
            },
            TypeRef::Array { element, rank } => TypeRef::Array {
                element: Box::new(element.substitute(arguments)),
                rank: *rank,
            },
            TypeRef::ByRef { element } => TypeRef::ByRef {
                element: Box::new(element.substitute(arguments)),
            },
            TypeRef::Pointer { element } => TypeRef::Pointer {
                element: Box::new(element.substitute(arguments)),
            },
        }
    }

    fn is_nullable(&self) -> bool {
        matches!(
            self,
            TypeRef::Named {
                namespace: Some(ns),
                name,
                declaring_type: None,
                generic_arguments,
            } if ns == NULLABLE_NAMESPACE && name == NULLABLE_NAME && generic_arguments.len() == 1
        )
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&canonical_name(self))
    }
}

/// Returns the canonical display/identity string for a type reference.
///
/// # Example
/// ```
/// use apicompat_core::naming::{canonical_name, TypeRef};
///
/// let int = TypeRef::named("System", "Int32");
/// let list =
///     TypeRef::named("System.Collections.Generic", "List`1").with_arguments(vec![int.clone()]);
/// let nullable = TypeRef::named("System", "Nullable`1").with_arguments(vec![int]);
///
/// assert_eq!(canonical_name(&list), "System.Collections.Generic.List<System.Int32>");
/// assert_eq!(canonical_name(&nullable), "System.Int32?");
/// ```
pub fn canonical_name(ty: &TypeRef) -> String {
    let mut out = String::new();
    write_canonical(ty, &mut out);
    out
}

fn write_canonical(ty: &TypeRef, out: &mut String) {
    match ty {
        TypeRef::GenericParameter { name, .. } => out.push_str(name),
        TypeRef::ByRef { element } => write_canonical(element, out),
        TypeRef::Array { element, rank } => {
            write_canonical(element, out);
            out.push('[');
            for _ in 1..(*rank).max(1) {
                out.push(',');
            }
            out.push(']');
        }
        TypeRef::Pointer { element } => {
            write_canonical(element, out);
            out.push('*');
        }
        TypeRef::Named { .. } if ty.is_nullable() => {
            write_canonical(&ty.generic_arguments()[0], out);
            out.push('?');
        }
        TypeRef::Named {
            namespace,
            name,
            declaring_type,
            generic_arguments,
        } => {
            let own_arguments = match declaring_type {
                Some(declaring) => {
                    let bound = declaring.total_arity();
                    let own = if bound > 0 && generic_arguments.len() >= bound {
                        let parent = declaring.with_arguments(generic_arguments[..bound].to_vec());
                        write_canonical(&parent, out);
                        &generic_arguments[bound..]
                    } else {
                        write_canonical(declaring, out);
                        &generic_arguments[..]
                    };
                    out.push('+');
                    own
                }
                None => {
                    if let Some(ns) = namespace.as_deref().filter(|ns| !ns.is_empty()) {
                        out.push_str(ns);
                        out.push('.');
                    }
                    &generic_arguments[..]
                }
            };

            out.push_str(strip_arity(name));
            write_argument_list(own_arguments, out);
        }
    }
}

fn write_argument_list(arguments: &[TypeRef], out: &mut String) {
    if arguments.is_empty() {
        return;
    }
    out.push('<');
    for (i, argument) in arguments.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_canonical(argument, out);
    }
    out.push('>');
}

/// Strips a trailing arity marker: `` Dictionary`2 `` becomes `Dictionary`.
pub fn strip_arity(name: &str) -> &str {
    match name.rfind('`') {
        Some(idx)
            if idx + 1 < name.len() && name[idx + 1..].bytes().all(|b| b.is_ascii_digit()) =>
        {
            &name[..idx]
        }
        _ => name,
    }
}

fn own_arity(name: &str) -> usize {
    let stripped = strip_arity(name);
    if stripped.len() == name.len() {
        0
    } else {
        name[stripped.len() + 1..].parse().unwrap_or(0)
    }
}

/// Label used for a positional constraint list (`T0`, `T1`, ...).
pub fn constraint_label(position: usize) -> String {
    format!("T{}", position)
}

/// Returns true for compiler-synthesized names that cannot carry a stable Id.
pub fn is_synthesized_name(name: &str) -> bool {
    synthesized_name_regex().is_match(name)
}

/// A constant value: a parameter default or the value of a `const` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    String(String),
}

impl Literal {
    /// Renders the literal the way it appears in descriptor Ids.
    pub fn render(&self) -> String {
        match self {
            Literal::Null => "null".to_string(),
            Literal::Bool(b) => b.to_string(),
            Literal::Int(i) => i.to_string(),
            Literal::UInt(u) => u.to_string(),
            Literal::Float(f) => format!("{:?}", f),
            Literal::Char(c) => {
                let mut out = String::from("'");
                escape_into(&c.to_string(), '\'', &mut out);
                out.push('\'');
                out
            }
            Literal::String(s) => {
                let mut out = String::from("\"");
                escape_into(s, '"', &mut out);
                out.push('"');
                out
            }
        }
    }
}

fn escape_into(s: &str, quote: char, out: &mut String) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
}
