//! Interface resolution.
//!
//! A listing records only the interfaces a type *directly* implements. An
//! interface is left out when its presence is already explained by the base
//! type or by another listed interface; otherwise every subclass of an
//! interface-implementing base would appear to add that interface.
//!
//! Three cases are handled:
//!
//! - classes and structs drop interfaces inherited from the base type unless
//!   the type maps one of the interface's slots to a member it declares
//!   itself (reimplementation)
//! - interfaces drop extended interfaces that another extended interface
//!   already brings in
//! - generic parameter constraint sets drop interfaces implied by the class
//!   bound or by another constraint interface's own list
//!
//! Results keep declaration order. Interface closures are memoized per type
//! for the lifetime of one [`InterfaceResolver`], which callers create per
//! extraction.
//!
//! A resolver built [`with_visibility`](InterfaceResolver::with_visibility)
//! never lists a hidden interface. Hidden interfaces are replaced by the
//! visible interfaces they bring in before any pruning, so routing a public
//! interface through an internal one does not change the result.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::model::TypeKind;
use crate::naming::{canonical_name, TypeRef};
use crate::provider::{GenericParameterFacts, MetadataProvider, TypeHandle};

/// Implicit class bound of a `struct` constraint; never listed.
const VALUE_TYPE_BASE: &str = "System.ValueType";

/// Predicate deciding whether an interface may appear in a listing.
pub type VisibilityPredicate<'p> = dyn Fn(&TypeRef) -> bool + 'p;

/// Computes directly implemented interfaces against one provider.
pub struct InterfaceResolver<'p, P: MetadataProvider + ?Sized> {
    provider: &'p P,
    visible: Option<&'p VisibilityPredicate<'p>>,
    closures: HashMap<TypeHandle, Vec<TypeRef>>,
}

impl<'p, P: MetadataProvider + ?Sized> InterfaceResolver<'p, P> {
    /// Creates a resolver with an empty cache.
    pub fn new(provider: &'p P) -> Self {
        Self {
            provider,
            visible: None,
            closures: HashMap::new(),
        }
    }

    /// Restricts results to interfaces accepted by `visible`.
    pub fn with_visibility(mut self, visible: &'p VisibilityPredicate<'p>) -> Self {
        self.visible = Some(visible);
        self
    }

    fn is_visible(&self, reference: &TypeRef) -> bool {
        self.visible.map_or(true, |visible| visible(reference))
    }

    /// Every interface `reference` implements, transitively, expressed in
    /// terms of the reference's generic arguments.
    ///
    /// Unresolvable references implement nothing as far as the resolver can tell.
    pub fn all_interfaces(&mut self, reference: &TypeRef) -> Vec<TypeRef> {
        let reference = reference.without_by_ref();
        match self.provider.resolve(reference) {
            Some(handle) => self
                .closure(handle)
                .iter()
                .map(|iface| iface.substitute(reference.generic_arguments()))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Interfaces named in the declaration of `reference` (one level only).
    pub fn declared_interfaces(&self, reference: &TypeRef) -> Vec<TypeRef> {
        let reference = reference.without_by_ref();
        self.provider
            .resolve(reference)
            .and_then(|handle| self.provider.type_facts(handle))
            .map(|facts| {
                facts
                    .interfaces
                    .iter()
                    .map(|iface| iface.substitute(reference.generic_arguments()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Interfaces to record on `ty`, in declaration order.
    pub fn direct_interfaces(&mut self, ty: TypeHandle) -> Vec<TypeRef> {
        let provider = self.provider;
        let Some(facts) = provider.type_facts(ty) else {
            return Vec::new();
        };
        // The closure is transitive, so dropping hidden entries keeps every
        // visible interface they extend.
        let all: Vec<TypeRef> = self
            .closure(ty)
            .into_iter()
            .filter(|iface| {
                let visible = self.is_visible(iface);
                if !visible {
                    trace!(interface = %canonical_name(iface), "not visible; omitted");
                }
                visible
            })
            .collect();

        match facts.kind {
            TypeKind::Interface => self.without_transitive(&all),
            TypeKind::Class | TypeKind::Struct | TypeKind::Enumeration => {
                let inherited: HashSet<String> = match facts.base_type {
                    Some(ref base) => self
                        .all_interfaces(base)
                        .iter()
                        .map(canonical_name)
                        .collect(),
                    None => HashSet::new(),
                };

                all.into_iter()
                    .filter(|iface| {
                        let name = canonical_name(iface);
                        if !inherited.contains(&name) {
                            return true;
                        }
                        let reimplemented = provider
                            .interface_map(ty, iface)
                            .iter()
                            .any(|slot| slot.implementation.owner == ty);
                        if !reimplemented {
                            trace!(interface = %name, "inherited from base type; omitted");
                        }
                        reimplemented
                    })
                    .collect()
            }
        }
    }

    /// Resolves a generic parameter's constraint list: the class bound
    /// first (if any), then the interfaces it needs to list directly.
    pub fn constraint_set(&mut self, parameter: &GenericParameterFacts) -> Vec<TypeRef> {
        let mut base: Option<TypeRef> = None;
        let mut interfaces: Vec<TypeRef> = Vec::new();

        for constraint in &parameter.constraints {
            if parameter.value_type && canonical_name(constraint) == VALUE_TYPE_BASE {
                continue;
            }
            if base.is_none() && self.is_class(constraint) {
                base = Some(constraint.clone());
            } else if self.is_visible(constraint) {
                interfaces.push(constraint.clone());
            } else {
                // a hidden constraint stands for the visible interfaces it extends
                let expanded: Vec<TypeRef> = self
                    .all_interfaces(constraint)
                    .into_iter()
                    .filter(|inner| self.is_visible(inner))
                    .collect();
                trace!(
                    interface = %canonical_name(constraint),
                    parameter = %parameter.name,
                    "not visible; replaced by its visible interfaces"
                );
                interfaces.extend(expanded);
            }
        }
        let mut seen = HashSet::new();
        interfaces.retain(|iface| seen.insert(canonical_name(iface)));

        let from_base: HashSet<String> = match base {
            Some(ref bound) => self
                .all_interfaces(bound)
                .iter()
                .map(canonical_name)
                .collect(),
            None => HashSet::new(),
        };

        let mut result: Vec<TypeRef> = base.into_iter().collect();
        for iface in &interfaces {
            let name = canonical_name(iface);
            if from_base.contains(&name) {
                trace!(
                    interface = %name,
                    parameter = %parameter.name,
                    "implied by class bound; omitted"
                );
                continue;
            }
            let implied = interfaces.iter().any(|other| {
                canonical_name(other) != name
                    && self
                        .declared_interfaces(other)
                        .iter()
                        .any(|inner| canonical_name(inner) == name)
            });
            if implied {
                trace!(
                    interface = %name,
                    parameter = %parameter.name,
                    "implied by another constraint; omitted"
                );
                continue;
            }
            result.push(iface.clone());
        }
        result
    }

    /// True only for references that resolve to a non-interface type.
    fn is_class(&self, reference: &TypeRef) -> bool {
        self.provider
            .resolve(reference)
            .and_then(|handle| self.provider.type_facts(handle))
            .is_some_and(|facts| facts.kind != TypeKind::Interface)
    }

    /// Drops interfaces reachable through another interface in the same list.
    fn without_transitive(&mut self, all: &[TypeRef]) -> Vec<TypeRef> {
        let names: Vec<String> = all.iter().map(canonical_name).collect();
        let reachable: Vec<HashSet<String>> = all
            .iter()
            .map(|iface| {
                self.all_interfaces(iface)
                    .iter()
                    .map(canonical_name)
                    .collect()
            })
            .collect();

        all.iter()
            .enumerate()
            .filter(|(i, _)| {
                let implied = reachable.iter().enumerate().any(|(j, set)| {
                    j != *i && names[j] != names[*i] && set.contains(&names[*i])
                });
                if implied {
                    trace!(
                        interface = %names[*i],
                        "extended through another interface; omitted"
                    );
                }
                !implied
            })
            .map(|(_, iface)| iface.clone())
            .collect()
    }

    /// Transitive interface list of a definition, in its own generic terms:
    /// declared interfaces (each followed by what it extends), then the base
    /// chain's interfaces. Duplicates keep their first position.
    fn closure(&mut self, handle: TypeHandle) -> Vec<TypeRef> {
        if let Some(cached) = self.closures.get(&handle) {
            return cached.clone();
        }
        // Seed the cache so a malformed cyclic hierarchy terminates.
        self.closures.insert(handle, Vec::new());

        let provider = self.provider;
        let Some(facts) = provider.type_facts(handle) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut result = Vec::new();
        let mut push = |iface: TypeRef, result: &mut Vec<TypeRef>| {
            if seen.insert(canonical_name(&iface)) {
                result.push(iface);
            }
        };

        for iface in &facts.interfaces {
            push(iface.clone(), &mut result);
            for inner in self.all_interfaces(iface) {
                push(inner, &mut result);
            }
        }
        if facts.kind != TypeKind::Interface {
            if let Some(ref base) = facts.base_type {
                for inner in self.all_interfaces(base) {
                    push(inner, &mut result);
                }
            }
        }

        self.closures.insert(handle, result.clone());
        result
    }
}
