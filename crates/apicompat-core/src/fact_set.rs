//! In-memory metadata provider.
//!
//! A [`FactSet`] holds already-extracted symbol facts for one module plus the
//! dependency types needed to resolve base types and interfaces. It
//! deserializes from the JSON "fact set" document accepted by the CLI, and
//! tests build it programmatically.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::naming::{canonical_name, TypeRef};
use crate::provider::{
    GenericOwner, GenericParameterFacts, InterfaceSlot, MemberFacts, MemberHandle,
    MetadataProvider, ParameterFacts, TypeFacts, TypeHandle,
};

/// A type together with its members and generic parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeEntry {
    #[serde(flatten)]
    pub facts: TypeFacts,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_parameters: Vec<GenericParameterFacts>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberEntry>,
    /// Dependency types are resolvable but not part of the module.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dependency: bool,
}

impl TypeEntry {
    /// Creates an entry with no members.
    pub fn new(facts: TypeFacts) -> Self {
        Self {
            facts,
            generic_parameters: Vec::new(),
            members: Vec::new(),
            dependency: false,
        }
    }

    /// Adds a member.
    pub fn member(mut self, member: MemberEntry) -> Self {
        self.members.push(member);
        self
    }

    /// Adds a generic parameter.
    pub fn generic_parameter(mut self, parameter: GenericParameterFacts) -> Self {
        self.generic_parameters.push(parameter);
        self
    }
}

/// A member together with its parameters and generic parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberEntry {
    #[serde(flatten)]
    pub facts: MemberFacts,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterFacts>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_parameters: Vec<GenericParameterFacts>,
}

impl MemberEntry {
    /// Creates an entry with no parameters.
    pub fn new(facts: MemberFacts) -> Self {
        Self {
            facts,
            parameters: Vec::new(),
            generic_parameters: Vec::new(),
        }
    }

    /// Adds a parameter.
    pub fn parameter(mut self, parameter: ParameterFacts) -> Self {
        self.parameters.push(parameter);
        self
    }
}

/// Serialized shape of a fact set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactDocument {
    pub assembly_identity: String,
    #[serde(default)]
    pub types: Vec<TypeEntry>,
}

/// In-memory [`MetadataProvider`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "FactDocument", into = "FactDocument")]
pub struct FactSet {
    assembly_identity: String,
    types: Vec<TypeEntry>,
    index: HashMap<String, TypeHandle>,
}

impl From<FactDocument> for FactSet {
    fn from(document: FactDocument) -> Self {
        let mut set = FactSet::new(document.assembly_identity);
        for entry in document.types {
            set.push(entry);
        }
        set
    }
}

impl From<FactSet> for FactDocument {
    fn from(set: FactSet) -> Self {
        FactDocument {
            assembly_identity: set.assembly_identity,
            types: set.types,
        }
    }
}

impl FactSet {
    /// Creates an empty fact set.
    pub fn new(assembly_identity: impl Into<String>) -> Self {
        Self {
            assembly_identity: assembly_identity.into(),
            types: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Parses a fact set document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the fact set to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Adds a module type.
    pub fn add_type(&mut self, entry: TypeEntry) -> TypeHandle {
        self.push(entry)
    }

    /// Adds a dependency type, available for resolution only.
    pub fn add_dependency(&mut self, mut entry: TypeEntry) -> TypeHandle {
        entry.dependency = true;
        self.push(entry)
    }

    /// Returns the stored entry for a handle.
    pub fn entry(&self, ty: TypeHandle) -> Option<&TypeEntry> {
        self.types.get(ty.0 as usize)
    }

    fn push(&mut self, entry: TypeEntry) -> TypeHandle {
        let handle = TypeHandle(self.types.len() as u32);
        if let Some(key) = entry.facts.reference.definition_key() {
            // first definition wins, matching metadata resolution order
            self.index.entry(key).or_insert(handle);
        }
        self.types.push(entry);
        handle
    }

    fn member_entry(&self, member: MemberHandle) -> Option<&MemberEntry> {
        self.entry(member.owner)?
            .members
            .get(member.index as usize)
    }
}

impl MetadataProvider for FactSet {
    fn assembly_identity(&self) -> &str {
        &self.assembly_identity
    }

    fn list_types(&self) -> Vec<TypeHandle> {
        self.types
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.dependency)
            .map(|(i, _)| TypeHandle(i as u32))
            .collect()
    }

    fn type_facts(&self, ty: TypeHandle) -> Option<&TypeFacts> {
        self.entry(ty).map(|entry| &entry.facts)
    }

    fn list_members(&self, ty: TypeHandle) -> Vec<MemberHandle> {
        self.entry(ty)
            .map(|entry| {
                (0..entry.members.len())
                    .map(|index| MemberHandle {
                        owner: ty,
                        index: index as u32,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn member_facts(&self, member: MemberHandle) -> Option<&MemberFacts> {
        self.member_entry(member).map(|entry| &entry.facts)
    }

    fn list_parameters(&self, member: MemberHandle) -> &[ParameterFacts] {
        self.member_entry(member)
            .map(|entry| entry.parameters.as_slice())
            .unwrap_or(&[])
    }

    fn list_generic_parameters(&self, owner: GenericOwner) -> &[GenericParameterFacts] {
        match owner {
            GenericOwner::Type(ty) => self
                .entry(ty)
                .map(|entry| entry.generic_parameters.as_slice())
                .unwrap_or(&[]),
            GenericOwner::Method(member) => self
                .member_entry(member)
                .map(|entry| entry.generic_parameters.as_slice())
                .unwrap_or(&[]),
        }
    }

    fn resolve(&self, reference: &TypeRef) -> Option<TypeHandle> {
        let key = reference.without_by_ref().definition_key()?;
        self.index.get(&key).copied()
    }

    fn interface_map(&self, ty: TypeHandle, interface: &TypeRef) -> Vec<InterfaceSlot> {
        let target = canonical_name(interface);
        let mut visited = HashSet::new();
        let mut current = Some((ty, Vec::<TypeRef>::new()));

        while let Some((handle, arguments)) = current {
            if !visited.insert(handle) {
                break;
            }
            let Some(entry) = self.entry(handle) else {
                break;
            };

            let slots: Vec<InterfaceSlot> = entry
                .members
                .iter()
                .enumerate()
                .filter(|(_, member)| {
                    member
                        .facts
                        .explicit_interface
                        .iter()
                        .chain(member.facts.implements.iter())
                        .any(|i| canonical_name(&i.substitute(&arguments)) == target)
                })
                .map(|(index, member)| InterfaceSlot {
                    interface_member: member.facts.name.clone(),
                    implementation: MemberHandle {
                        owner: handle,
                        index: index as u32,
                    },
                })
                .collect();
            if !slots.is_empty() {
                return slots;
            }

            current = entry.facts.base_type.as_ref().and_then(|base| {
                let base = base.substitute(&arguments);
                self.resolve(&base)
                    .map(|h| (h, base.generic_arguments().to_vec()))
            });
        }

        Vec::new()
    }
}
