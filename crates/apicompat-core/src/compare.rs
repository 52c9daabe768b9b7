//! Listing comparison.
//!
//! Types are matched by canonical name and members by [`MemberSignature`].
//! Matched pairs whose Ids differ produce `*Changed` violations; baseline
//! entries without a match produce `*Removed` violations. Additions are never
//! reported. Violations matching an [`Exclusion`] are moved to
//! [`ComparisonReport::suppressed`], and exclusions that matched nothing are
//! reported back so callers can flag stale entries.

use std::collections::{BTreeSet, HashMap, HashSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Violation, ViolationKind};
use crate::model::{Descriptor, Listing, MemberDescriptor, MemberSignature, TypeDescriptor};

/// Predicate deciding which descriptors take part in a comparison.
///
/// Applied to every type of both listings and to every member of retained
/// types. Returning `false` drops the descriptor and everything under it.
pub type DescriptorFilter = dyn Fn(Descriptor<'_>) -> bool + Send + Sync;

/// A filter that keeps everything.
pub fn keep_all() -> Box<DescriptorFilter> {
    Box::new(|_| true)
}

/// A filter that drops types declared in any of `namespaces` or their
/// child namespaces.
pub fn exclude_namespaces<I, S>(namespaces: I) -> Box<DescriptorFilter>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let prefixes: Vec<String> = namespaces.into_iter().map(Into::into).collect();
    Box::new(move |descriptor| match descriptor {
        Descriptor::Type(ty) => !prefixes.iter().any(|ns| {
            ty.name
                .strip_prefix(ns.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
        }),
        _ => true,
    })
}

/// One approved violation, identified by baseline type Id and member Id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Exclusion {
    pub type_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
}

impl Exclusion {
    /// Excludes a type-level violation.
    pub fn for_type(type_id: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            member_id: None,
        }
    }

    /// Excludes a member-level violation.
    pub fn for_member(type_id: impl Into<String>, member_id: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            member_id: Some(member_id.into()),
        }
    }
}

impl From<&Violation> for Exclusion {
    fn from(violation: &Violation) -> Self {
        Self {
            type_id: violation.type_id.clone(),
            member_id: violation.member_id.clone(),
        }
    }
}

/// An ordered set of exclusions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Exclusions {
    entries: BTreeSet<Exclusion>,
}

impl Exclusions {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an exclusion. Returns false if it was already present.
    pub fn insert(&mut self, exclusion: Exclusion) -> bool {
        self.entries.insert(exclusion)
    }

    /// Returns true if the violation is excluded.
    pub fn contains(&self, violation: &Violation) -> bool {
        self.entries.contains(&Exclusion::from(violation))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exclusion> {
        self.entries.iter()
    }
}

impl FromIterator<Exclusion> for Exclusions {
    fn from_iter<T: IntoIterator<Item = Exclusion>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Result of one comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComparisonReport {
    /// Unsuppressed violations, sorted.
    #[serde(default)]
    pub violations: Vec<Violation>,

    /// Violations matched by an exclusion, sorted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<Violation>,

    /// Exclusions that matched no violation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unused_exclusions: Vec<Exclusion>,
}

impl ComparisonReport {
    /// Returns true when no unsuppressed violation remains.
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of unsuppressed violations of the given kind.
    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }
}

/// Compares a baseline listing against a candidate.
///
/// # Example
/// ```
/// use apicompat_core::compare::Comparator;
/// use apicompat_core::model::{Listing, MemberDescriptor, TypeDescriptor};
///
/// let baseline = Listing::new("Lib").with_type(
///     TypeDescriptor::class("Lib.Foo").member(MemberDescriptor::method("Bar", "System.Void")),
/// );
/// let candidate = Listing::new("Lib").with_type(TypeDescriptor::class("Lib.Foo"));
///
/// let report = Comparator::new(&baseline, &candidate).compare();
/// assert!(!report.passed());
/// assert_eq!(report.violations[0].member_id.as_deref(), Some("public System.Void Bar()"));
/// ```
pub struct Comparator<'a> {
    baseline: &'a Listing,
    candidate: &'a Listing,
    exclusions: Option<&'a Exclusions>,
    filter: Option<&'a DescriptorFilter>,
}

impl<'a> Comparator<'a> {
    /// Creates a comparator with no exclusions and no filter.
    pub fn new(baseline: &'a Listing, candidate: &'a Listing) -> Self {
        Self {
            baseline,
            candidate,
            exclusions: None,
            filter: None,
        }
    }

    /// Sets the exclusion set.
    pub fn exclusions(mut self, exclusions: &'a Exclusions) -> Self {
        self.exclusions = Some(exclusions);
        self
    }

    /// Sets the descriptor filter.
    pub fn filter(mut self, filter: &'a DescriptorFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Runs the comparison. Always completes; violations are data.
    pub fn compare(&self) -> ComparisonReport {
        let candidates: HashMap<&str, &TypeDescriptor> = self
            .candidate
            .types
            .iter()
            .filter(|ty| self.keeps(Descriptor::Type(ty)))
            .map(|ty| (ty.name.as_str(), ty))
            .collect();

        let found: Vec<Violation> = self
            .baseline
            .types
            .par_iter()
            .filter(|ty| self.keeps(Descriptor::Type(ty)))
            .flat_map_iter(|ty| self.compare_type(ty, candidates.get(ty.name.as_str()).copied()))
            .collect();

        let mut report = ComparisonReport::default();
        let mut used = HashSet::new();
        for violation in found {
            match self.exclusions {
                Some(exclusions) if exclusions.contains(&violation) => {
                    used.insert(Exclusion::from(&violation));
                    report.suppressed.push(violation);
                }
                _ => report.violations.push(violation),
            }
        }
        report.violations.sort();
        report.suppressed.sort();
        if let Some(exclusions) = self.exclusions {
            report.unused_exclusions = exclusions
                .iter()
                .filter(|e| !used.contains(*e))
                .cloned()
                .collect();
        }

        debug!(
            baseline = %self.baseline.assembly_identity,
            candidate = %self.candidate.assembly_identity,
            violations = report.violations.len(),
            suppressed = report.suppressed.len(),
            unused_exclusions = report.unused_exclusions.len(),
            "comparison complete"
        );
        report
    }

    fn keeps(&self, descriptor: Descriptor<'_>) -> bool {
        self.filter.map_or(true, |filter| filter(descriptor))
    }

    fn compare_type(
        &self,
        baseline: &TypeDescriptor,
        candidate: Option<&TypeDescriptor>,
    ) -> Vec<Violation> {
        let type_id = baseline.id();
        let Some(candidate) = candidate else {
            return vec![Violation::new(
                ViolationKind::TypeRemoved,
                type_id,
                format!("Type `{}` was removed", baseline.name),
            )];
        };

        let mut violations = Vec::new();
        let candidate_id = candidate.id();
        if candidate_id != type_id {
            violations.push(Violation::new(
                ViolationKind::TypeChanged,
                type_id.clone(),
                format!("Type `{}` changed to `{}`", type_id, candidate_id),
            ));
        }

        let mut by_signature: HashMap<MemberSignature, Vec<&MemberDescriptor>> = HashMap::new();
        for member in candidate
            .members
            .iter()
            .filter(|m| self.keeps(Descriptor::Member(m)))
        {
            by_signature.entry(member.signature()).or_default().push(member);
        }

        for member in baseline
            .members
            .iter()
            .filter(|m| self.keeps(Descriptor::Member(m)))
        {
            let member_id = member.id();
            let Some(matches) = by_signature.get(&member.signature()) else {
                violations.push(Violation::with_member(
                    ViolationKind::MemberRemoved,
                    type_id.clone(),
                    member_id.clone(),
                    format!("Member `{}` was removed from `{}`", member_id, baseline.name),
                ));
                continue;
            };
            let candidate_ids: Vec<String> = matches.iter().map(|m| m.id()).collect();
            if !candidate_ids.contains(&member_id) {
                violations.push(Violation::with_member(
                    ViolationKind::MemberChanged,
                    type_id.clone(),
                    member_id.clone(),
                    format!("Member `{}` changed to `{}`", member_id, candidate_ids[0]),
                ));
            }
        }

        violations
    }
}

/// Compares two listings with optional exclusions and filter.
pub fn compare_listings(
    baseline: &Listing,
    candidate: &Listing,
    exclusions: &Exclusions,
    filter: &DescriptorFilter,
) -> ComparisonReport {
    Comparator::new(baseline, candidate)
        .exclusions(exclusions)
        .filter(filter)
        .compare()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Direction, ParameterDescriptor, Visibility};
    use pretty_assertions::assert_eq;

    fn foo() -> TypeDescriptor {
        TypeDescriptor::class("Lib.Foo")
            .member(MemberDescriptor::constructor())
            .member(MemberDescriptor::method("Bar", "System.Void"))
            .member(
                MemberDescriptor::method("Parse", "System.Boolean")
                    .parameter(ParameterDescriptor::new("text", "System.String"))
                    .parameter(
                        ParameterDescriptor::new("value", "System.Int32")
                            .direction(Direction::Out),
                    ),
            )
    }

    fn listing(types: Vec<TypeDescriptor>) -> Listing {
        let mut listing = Listing::new("Lib");
        listing.types = types;
        listing.sort();
        listing
    }

    #[test]
    fn test_identical_listings_pass() {
        let baseline = listing(vec![foo(), TypeDescriptor::interface("Lib.IBar")]);
        let report = Comparator::new(&baseline, &baseline).compare();
        assert!(report.passed());
        assert_eq!(report, ComparisonReport::default());
    }

    #[test]
    fn test_additions_are_not_violations() {
        let baseline = listing(vec![foo()]);
        let candidate = listing(vec![
            foo().member(MemberDescriptor::method("Baz", "System.Void")),
            TypeDescriptor::class("Lib.New"),
        ]);
        assert!(Comparator::new(&baseline, &candidate).compare().passed());
    }

    #[test]
    fn test_removed_member() {
        let baseline = listing(vec![foo()]);
        let mut trimmed = foo();
        trimmed.members.retain(|m| m.name != "Bar");
        let candidate = listing(vec![trimmed]);

        let report = Comparator::new(&baseline, &candidate).compare();
        assert_eq!(report.violations.len(), 1);
        let violation = &report.violations[0];
        assert_eq!(violation.kind, ViolationKind::MemberRemoved);
        assert_eq!(violation.type_id, "public class Lib.Foo");
        assert_eq!(violation.member_id.as_deref(), Some("public System.Void Bar()"));
    }

    #[test]
    fn test_removed_type() {
        let baseline = listing(vec![foo(), TypeDescriptor::class("Lib.Gone")]);
        let candidate = listing(vec![foo()]);

        let report = Comparator::new(&baseline, &candidate).compare();
        assert_eq!(
            report.violations,
            vec![Violation::new(
                ViolationKind::TypeRemoved,
                "public class Lib.Gone",
                "Type `Lib.Gone` was removed",
            )]
        );
    }

    #[test]
    fn test_rename_is_removal() {
        let baseline = listing(vec![TypeDescriptor::class("Lib.Old")]);
        let candidate = listing(vec![TypeDescriptor::class("Lib.Renamed")]);
        let report = Comparator::new(&baseline, &candidate).compare();
        assert_eq!(report.count(ViolationKind::TypeRemoved), 1);
        assert_eq!(report.violations.len(), 1);
    }

    #[test]
    fn test_type_declaration_changes() {
        let baseline = listing(vec![TypeDescriptor::class("Lib.Foo").implements("Lib.IBar")]);
        let mut sealed = TypeDescriptor::class("Lib.Foo");
        sealed.is_sealed = true;
        let candidate = listing(vec![sealed]);

        let report = Comparator::new(&baseline, &candidate).compare();
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].kind, ViolationKind::TypeChanged);
        assert_eq!(
            report.violations[0].description,
            "Type `public class Lib.Foo : Lib.IBar` changed to `public sealed class Lib.Foo`"
        );
    }

    #[test]
    fn test_visibility_narrowing_is_breaking() {
        let baseline = listing(vec![foo()]);
        let mut narrowed = foo();
        narrowed.members = narrowed
            .members
            .into_iter()
            .map(|m| if m.name == "Bar" { m.visibility(Visibility::Protected) } else { m })
            .collect();
        let candidate = listing(vec![narrowed]);

        let report = Comparator::new(&baseline, &candidate).compare();
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].kind, ViolationKind::MemberChanged);
        assert_eq!(
            report.violations[0].description,
            "Member `public System.Void Bar()` changed to `protected System.Void Bar()`"
        );

        let exclusions: Exclusions = [Exclusion::for_member(
            "public class Lib.Foo",
            "public System.Void Bar()",
        )]
        .into_iter()
        .collect();
        let report = Comparator::new(&baseline, &candidate)
            .exclusions(&exclusions)
            .compare();
        assert!(report.passed());
        assert_eq!(report.suppressed.len(), 1);
        assert!(report.unused_exclusions.is_empty());
    }

    #[test]
    fn test_parameter_direction_is_part_of_signature() {
        let baseline = listing(vec![foo()]);
        let mut changed = foo();
        for member in &mut changed.members {
            for parameter in &mut member.parameters {
                if parameter.direction == Direction::Out {
                    parameter.direction = Direction::Ref;
                }
            }
        }
        let candidate = listing(vec![changed]);

        let report = Comparator::new(&baseline, &candidate).compare();
        assert_eq!(report.count(ViolationKind::MemberRemoved), 1);
    }

    #[test]
    fn test_parameter_rename_is_a_change() {
        let baseline = listing(vec![foo()]);
        let mut renamed = foo();
        for member in &mut renamed.members {
            for parameter in &mut member.parameters {
                if parameter.name == "text" {
                    parameter.name = "input".to_string();
                }
            }
        }
        let candidate = listing(vec![renamed]);

        let report = Comparator::new(&baseline, &candidate).compare();
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].kind, ViolationKind::MemberChanged);
    }

    #[test]
    fn test_unused_exclusions_are_reported() {
        let baseline = listing(vec![foo()]);
        let stale = Exclusion::for_type("public class Lib.Missing");
        let exclusions: Exclusions = [stale.clone()].into_iter().collect();

        let report = Comparator::new(&baseline, &baseline)
            .exclusions(&exclusions)
            .compare();
        assert!(report.passed());
        assert_eq!(report.unused_exclusions, vec![stale]);
    }

    #[test]
    fn test_namespace_filter_drops_type_and_members() {
        let internal = TypeDescriptor::class("Lib.Internal.Cache")
            .member(MemberDescriptor::method("Flush", "System.Void"));
        let baseline = listing(vec![
            foo(),
            internal.clone(),
            TypeDescriptor::class("Lib.Internal.Gone"),
        ]);
        let mut changed = internal;
        changed.members.clear();
        changed.is_sealed = true;
        let candidate = listing(vec![foo(), changed]);

        let unfiltered = Comparator::new(&baseline, &candidate).compare();
        assert_eq!(unfiltered.violations.len(), 3);

        let filter = exclude_namespaces(["Lib.Internal"]);
        let report = Comparator::new(&baseline, &candidate).filter(filter.as_ref()).compare();
        assert!(report.passed());
    }

    #[test]
    fn test_namespace_filter_matches_whole_segments() {
        let filter = exclude_namespaces(["Lib.Int"]);
        let ty = TypeDescriptor::class("Lib.Internal.Cache");
        assert!(filter(Descriptor::Type(&ty)));
        let nested = TypeDescriptor::class("Lib.Int.Cache");
        assert!(!filter(Descriptor::Type(&nested)));
        assert!(keep_all()(Descriptor::Type(&nested)));
    }

    #[test]
    fn test_violations_are_sorted() {
        let baseline = listing(vec![
            TypeDescriptor::class("Lib.B").member(MemberDescriptor::method("X", "System.Void")),
            TypeDescriptor::class("Lib.A")
                .member(MemberDescriptor::method("Y", "System.Void"))
                .member(MemberDescriptor::method("X", "System.Void")),
        ]);
        let mut a = TypeDescriptor::class("Lib.A");
        a.is_sealed = true;
        let candidate = listing(vec![a]);

        let report = Comparator::new(&baseline, &candidate).compare();
        let keys: Vec<(&str, Option<&str>)> = report
            .violations
            .iter()
            .map(|v| (v.type_id.as_str(), v.member_id.as_deref()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("public class Lib.A", None),
                ("public class Lib.A", Some("public System.Void X()")),
                ("public class Lib.A", Some("public System.Void Y()")),
                ("public class Lib.B", None),
            ]
        );
    }
}
