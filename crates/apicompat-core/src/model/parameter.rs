//! Parameter descriptors.

use serde::{Deserialize, Serialize};

use super::is_false;

/// How an argument is passed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Direction {
    #[default]
    In,
    Out,
    Ref,
}

impl Direction {
    /// Returns true for the default direction.
    pub fn is_in(&self) -> bool {
        *self == Direction::In
    }

    /// Keyword prefix used in Ids (empty for `In`).
    pub fn prefix(&self) -> &'static str {
        match self {
            Direction::In => "",
            Direction::Out => "out ",
            Direction::Ref => "ref ",
        }
    }
}

/// One parameter of a method or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterDescriptor {
    pub name: String,

    /// Canonical type name, by-ref marker stripped.
    #[serde(rename = "Type")]
    pub ty: String,

    #[serde(default, skip_serializing_if = "Direction::is_in")]
    pub direction: Direction,

    /// Rendered default value for optional parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// `params` array parameter.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_params: bool,
}

impl ParameterDescriptor {
    /// Creates an `In` parameter without a default.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            direction: Direction::In,
            default_value: None,
            is_params: false,
        }
    }

    /// Sets the direction.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the rendered default value.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Marks the parameter as a `params` array.
    pub fn params(mut self) -> Self {
        self.is_params = true;
        self
    }

    /// `[ref |out ][params ]Type Name[ = Default]`
    pub fn id(&self) -> String {
        let mut id = String::from(self.direction.prefix());
        if self.is_params {
            id.push_str("params ");
        }
        id.push_str(&self.ty);
        id.push(' ');
        id.push_str(&self.name);
        if let Some(ref default) = self.default_value {
            id.push_str(" = ");
            id.push_str(default);
        }
        id
    }
}
