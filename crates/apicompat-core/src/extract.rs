//! Listing extraction.
//!
//! Walks the facts a [`MetadataProvider`] reports for one module and builds a
//! [`Listing`]: canonical names for every type reference, directly
//! implemented interfaces, normalized modifiers, and Id-sorted output.

use std::collections::HashSet;

use tracing::debug;

use crate::error::ExtractionError;
use crate::interfaces::InterfaceResolver;
use crate::model::{
    Direction, GenericConstraintDescriptor, GenericParameterDescriptor, Listing,
    MemberDescriptor, MemberKind, ParameterDescriptor, TypeDescriptor, TypeKind, Visibility,
};
use crate::naming::{canonical_name, is_synthesized_name, TypeRef};
use crate::provider::{
    GenericOwner, GenericParameterFacts, MemberFacts, MemberHandle, MetadataProvider,
    ParameterFacts, TypeFacts, TypeHandle,
};

/// Implicit root of every class hierarchy; never recorded as a base type.
const OBJECT_TYPE: &str = "System.Object";

/// Runtime backing field of every enum.
const ENUM_VALUE_FIELD: &str = "value__";

/// Which declared visibilities make a type or member part of the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityFilter {
    allowed: Vec<Visibility>,
}

impl Default for VisibilityFilter {
    /// Public, Protected and ProtectedInternal.
    fn default() -> Self {
        Self::only(&[
            Visibility::Public,
            Visibility::Protected,
            Visibility::ProtectedInternal,
        ])
    }
}

impl VisibilityFilter {
    /// Keeps exactly the given visibilities.
    pub fn only(allowed: &[Visibility]) -> Self {
        Self {
            allowed: allowed.to_vec(),
        }
    }

    /// The default filter plus `Internal` (for modules that expose internals
    /// to friend modules).
    pub fn including_internal() -> Self {
        let mut filter = Self::default();
        filter.allowed.push(Visibility::Internal);
        filter
    }

    /// Returns true if a symbol with this visibility is kept.
    pub fn keeps(&self, visibility: Visibility) -> bool {
        self.allowed.contains(&visibility)
    }
}

/// Builds a listing from one provider.
pub struct Extractor<'p, P: MetadataProvider + ?Sized> {
    provider: &'p P,
    filter: VisibilityFilter,
}

impl<'p, P: MetadataProvider + ?Sized> Extractor<'p, P> {
    /// Creates an extractor with the default visibility filter.
    pub fn new(provider: &'p P) -> Self {
        Self {
            provider,
            filter: VisibilityFilter::default(),
        }
    }

    /// Replaces the visibility filter.
    pub fn with_filter(mut self, filter: VisibilityFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Extracts the listing.
    ///
    /// # Errors
    /// Returns [`ExtractionError`] when an exported construct has no stable
    /// name, when the provider lists a handle it cannot describe, or when two
    /// exported types share a canonical name.
    pub fn extract(&self) -> Result<Listing, ExtractionError> {
        let visible = |reference: &TypeRef| self.is_visible_reference(reference);
        let mut resolver = InterfaceResolver::new(self.provider).with_visibility(&visible);
        let mut names = HashSet::new();
        let mut types = Vec::new();

        for handle in self.provider.list_types() {
            let facts = self
                .provider
                .type_facts(handle)
                .ok_or(ExtractionError::UnknownType(handle))?;
            if !self.is_exported(facts) {
                continue;
            }

            let descriptor = self.describe_type(handle, facts, &mut resolver)?;
            if !names.insert(descriptor.name.clone()) {
                return Err(ExtractionError::DuplicateType(descriptor.name));
            }
            debug!(
                type_name = %descriptor.name,
                members = descriptor.members.len(),
                "extracted type"
            );
            types.push(descriptor);
        }

        types.sort_by_cached_key(|t| t.id());
        debug!(
            assembly = self.provider.assembly_identity(),
            types = types.len(),
            "extraction complete"
        );

        Ok(Listing {
            assembly_identity: self.provider.assembly_identity().to_string(),
            types,
        })
    }

    /// A type is exported when it and every enclosing type pass the filter.
    fn is_exported(&self, facts: &TypeFacts) -> bool {
        if !self.filter.keeps(facts.visibility) {
            return false;
        }
        match facts.reference {
            TypeRef::Named {
                declaring_type: Some(ref declaring),
                ..
            } => match self
                .provider
                .resolve(declaring)
                .and_then(|h| self.provider.type_facts(h))
            {
                Some(declaring_facts) => self.is_exported(declaring_facts),
                None => true,
            },
            _ => true,
        }
    }

    /// Types outside the provider's knowledge are assumed visible.
    fn is_visible_reference(&self, reference: &TypeRef) -> bool {
        self.provider
            .resolve(reference)
            .and_then(|h| self.provider.type_facts(h))
            .map_or(true, |facts| self.is_exported(facts))
    }

    fn describe_type(
        &self,
        handle: TypeHandle,
        facts: &TypeFacts,
        resolver: &mut InterfaceResolver<'_, P>,
    ) -> Result<TypeDescriptor, ExtractionError> {
        check_type_names(&facts.reference)?;
        let name = canonical_name(&facts.reference);
        let kind = facts.kind;

        let is_static = kind == TypeKind::Class && facts.is_abstract && facts.is_sealed;
        let base_type = match kind {
            TypeKind::Class => facts
                .base_type
                .as_ref()
                .map(canonical_name)
                .filter(|base| base != OBJECT_TYPE),
            _ => None,
        };

        let direct = resolver.direct_interfaces(handle);
        let implemented_interfaces: Vec<String> = direct.iter().map(canonical_name).collect();

        let enclosing_arity = match facts.reference {
            TypeRef::Named {
                declaring_type: Some(ref declaring),
                ..
            } => declaring.total_arity(),
            _ => 0,
        };
        let generic_parameters = self
            .provider
            .list_generic_parameters(GenericOwner::Type(handle))
            .iter()
            .filter(|p| p.position >= enclosing_arity)
            .map(|p| describe_generic_parameter(p, resolver, &name))
            .collect::<Result<Vec<_>, _>>()?;

        let mut members = Vec::new();
        for member in self.provider.list_members(handle) {
            let Some(member_facts) = self.provider.member_facts(member) else {
                continue;
            };
            if let Some(descriptor) =
                self.describe_member(member, member_facts, kind, &name, &direct, resolver)?
            {
                members.push(descriptor);
            }
        }
        members.sort_by_cached_key(|m| m.id());

        Ok(TypeDescriptor {
            name,
            visibility: facts.visibility,
            kind,
            is_abstract: !is_static && kind == TypeKind::Class && facts.is_abstract,
            is_static,
            is_sealed: !is_static && kind == TypeKind::Class && facts.is_sealed,
            base_type,
            implemented_interfaces,
            generic_parameters,
            members,
        })
    }

    fn describe_member(
        &self,
        handle: MemberHandle,
        facts: &MemberFacts,
        owner_kind: TypeKind,
        owner_name: &str,
        owner_interfaces: &[TypeRef],
        resolver: &mut InterfaceResolver<'_, P>,
    ) -> Result<Option<MemberDescriptor>, ExtractionError> {
        // explicit implementations skip the visibility filter unless the
        // interface itself is hidden
        let explicit = match facts.explicit_interface {
            Some(ref iface) if !self.is_visible_reference(iface) => return Ok(None),
            Some(_) => true,
            None if !self.filter.keeps(facts.visibility) => return Ok(None),
            None => false,
        };
        if owner_kind == TypeKind::Enumeration
            && facts.kind == MemberKind::Field
            && facts.name == ENUM_VALUE_FIELD
        {
            return Ok(None);
        }
        if is_synthesized_name(&facts.name) {
            return Err(ExtractionError::UnnamedConstruct {
                construct: "member",
                name: facts.name.clone(),
                context: owner_name.to_string(),
            });
        }

        let in_interface = owner_kind == TypeKind::Interface;
        let is_override = !in_interface && facts.is_virtual && !facts.is_new_slot;
        let is_abstract = !in_interface && facts.is_abstract;
        let is_virtual = !in_interface
            && facts.is_virtual
            && !facts.is_abstract
            && !facts.is_final
            && !is_override;

        let method_generics = self
            .provider
            .list_generic_parameters(GenericOwner::Method(handle));
        let mut name = facts.name.clone();
        if !method_generics.is_empty() {
            let labels: Vec<&str> = method_generics.iter().map(|p| p.name.as_str()).collect();
            name = format!("{}<{}>", name, labels.join(", "));
        }
        let mut generic_constraints = Vec::new();
        for parameter in method_generics {
            let constraint = describe_generic_constraint(parameter, resolver, owner_name)?;
            if constraint.has_constraints() {
                generic_constraints.push(constraint);
            }
        }

        let parameters = self
            .provider
            .list_parameters(handle)
            .iter()
            .enumerate()
            .map(|(position, p)| describe_parameter(position, p))
            .collect();

        let return_type = match facts.kind {
            MemberKind::Constructor => None,
            MemberKind::Method | MemberKind::Field => {
                facts.return_type.as_ref().map(canonical_name)
            }
        };
        let is_field = facts.kind == MemberKind::Field;

        let implemented_interface = if explicit {
            None
        } else {
            owner_interfaces
                .iter()
                .find(|iface| {
                    self.provider
                        .interface_map(handle.owner, iface)
                        .iter()
                        .any(|slot| slot.implementation == handle)
                })
                .map(canonical_name)
        };

        Ok(Some(MemberDescriptor {
            kind: facts.kind,
            name,
            parameters,
            return_type,
            sealed: facts.is_final && is_override,
            is_static: facts.is_static,
            is_virtual,
            is_override,
            is_abstract,
            new: facts.hides_base,
            extension: facts.is_extension,
            read_only: is_field && facts.is_init_only,
            explicit_interface: facts.explicit_interface.as_ref().map(canonical_name),
            implemented_interface,
            visibility: (!explicit).then_some(facts.visibility),
            generic_constraints,
            constant: is_field && facts.literal.is_some(),
            literal: if is_field {
                facts.literal.as_ref().map(|l| l.render())
            } else {
                None
            },
        }))
    }
}

/// Extracts a listing with the default visibility filter.
pub fn extract_listing<P: MetadataProvider + ?Sized>(
    provider: &P,
) -> Result<Listing, ExtractionError> {
    Extractor::new(provider).extract()
}

fn check_type_names(reference: &TypeRef) -> Result<(), ExtractionError> {
    if let TypeRef::Named {
        name,
        declaring_type,
        ..
    } = reference
    {
        if is_synthesized_name(name) {
            return Err(ExtractionError::UnnamedConstruct {
                construct: "type",
                name: name.clone(),
                context: reference
                    .namespace()
                    .unwrap_or("global namespace")
                    .to_string(),
            });
        }
        if let Some(declaring) = declaring_type {
            check_type_names(declaring)?;
        }
    }
    Ok(())
}

fn describe_generic_parameter<P: MetadataProvider + ?Sized>(
    parameter: &GenericParameterFacts,
    resolver: &mut InterfaceResolver<'_, P>,
    owner_name: &str,
) -> Result<GenericParameterDescriptor, ExtractionError> {
    if is_synthesized_name(&parameter.name) {
        return Err(ExtractionError::UnnamedConstruct {
            construct: "generic parameter",
            name: parameter.name.clone(),
            context: owner_name.to_string(),
        });
    }
    Ok(GenericParameterDescriptor {
        parameter_name: parameter.name.clone(),
        // `struct` implies `new()`; only the former is recorded
        new: parameter.default_constructor && !parameter.value_type,
        class: parameter.reference_type,
        is_struct: parameter.value_type,
        base_type_or_interfaces: resolver
            .constraint_set(parameter)
            .iter()
            .map(canonical_name)
            .collect(),
    })
}

fn describe_generic_constraint<P: MetadataProvider + ?Sized>(
    parameter: &GenericParameterFacts,
    resolver: &mut InterfaceResolver<'_, P>,
    owner_name: &str,
) -> Result<GenericConstraintDescriptor, ExtractionError> {
    let described = describe_generic_parameter(parameter, resolver, owner_name)?;
    Ok(GenericConstraintDescriptor {
        parameter_position: parameter.position,
        new: described.new,
        class: described.class,
        is_struct: described.is_struct,
        base_type_or_interfaces: described.base_type_or_interfaces,
    })
}

fn describe_parameter(position: usize, parameter: &ParameterFacts) -> ParameterDescriptor {
    let direction = match (parameter.ty.is_by_ref(), parameter.is_out) {
        (false, _) => Direction::In,
        (true, true) => Direction::Out,
        (true, false) => Direction::Ref,
    };
    let name = if parameter.name.is_empty() {
        format!("arg{}", position)
    } else {
        parameter.name.clone()
    };
    ParameterDescriptor {
        name,
        ty: canonical_name(&parameter.ty),
        direction,
        default_value: parameter.default_value.as_ref().map(|v| v.render()),
        is_params: parameter.is_params,
    }
}
