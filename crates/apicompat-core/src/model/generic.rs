//! Generic parameter and generic constraint descriptors.

use serde::{Deserialize, Serialize};

use super::{is_false, is_zero, render_where_clause};
use crate::naming::constraint_label;

/// A generic parameter declared by a type, identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenericParameterDescriptor {
    pub parameter_name: String,

    /// `new()` constraint.
    #[serde(default, skip_serializing_if = "is_false")]
    pub new: bool,

    /// `class` constraint.
    #[serde(default, skip_serializing_if = "is_false")]
    pub class: bool,

    /// `struct` constraint.
    #[serde(default, rename = "Struct", skip_serializing_if = "is_false")]
    pub is_struct: bool,

    /// Base type bound first, then directly required interfaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub base_type_or_interfaces: Vec<String>,
}

impl GenericParameterDescriptor {
    /// Creates an unconstrained parameter.
    pub fn new(parameter_name: impl Into<String>) -> Self {
        Self {
            parameter_name: parameter_name.into(),
            new: false,
            class: false,
            is_struct: false,
            base_type_or_interfaces: Vec::new(),
        }
    }

    /// Returns true if any constraint applies.
    pub fn has_constraints(&self) -> bool {
        self.new || self.class || self.is_struct || !self.base_type_or_interfaces.is_empty()
    }

    /// Returns the where-clause, or an empty string when unconstrained.
    pub fn id(&self) -> String {
        render_where_clause(
            &self.parameter_name,
            self.class,
            self.is_struct,
            &self.base_type_or_interfaces,
            self.new,
        )
        .unwrap_or_default()
    }
}

/// Constraints on a method's generic parameter, identified by position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenericConstraintDescriptor {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub parameter_position: usize,

    #[serde(default, skip_serializing_if = "is_false")]
    pub new: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub class: bool,

    #[serde(default, rename = "Struct", skip_serializing_if = "is_false")]
    pub is_struct: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub base_type_or_interfaces: Vec<String>,
}

impl GenericConstraintDescriptor {
    /// Creates an empty constraint set for the parameter at `position`.
    pub fn new(parameter_position: usize) -> Self {
        Self {
            parameter_position,
            new: false,
            class: false,
            is_struct: false,
            base_type_or_interfaces: Vec::new(),
        }
    }

    /// Positional label (`T0`, `T1`, ...).
    pub fn label(&self) -> String {
        constraint_label(self.parameter_position)
    }

    /// Returns true if any constraint applies.
    pub fn has_constraints(&self) -> bool {
        self.new || self.class || self.is_struct || !self.base_type_or_interfaces.is_empty()
    }

    /// Returns the where-clause, or an empty string when unconstrained.
    pub fn id(&self) -> String {
        render_where_clause(
            &self.label(),
            self.class,
            self.is_struct,
            &self.base_type_or_interfaces,
            self.new,
        )
        .unwrap_or_default()
    }
}
