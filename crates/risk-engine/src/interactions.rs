//! Disease interactions and count categories.
//!
//! Rules read a membership view of the resolved set in which every group
//! category also stands for the members it absorbed, so a rule written
//! against `HHS_HCC019` still fires after `HHS_HCC019` was folded into `G01`.

use std::collections::HashSet;

use risk_types::{Category, CategoryKind};

use crate::beneficiary::Beneficiary;
use crate::category_set::CategorySet;

/// A test a rule applies to the resolved set or the member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// The category is present.
    Has(&'static str),
    /// At least one of the categories is present.
    AnyOf(&'static [&'static str]),
    /// The member is a disabled Medicare beneficiary.
    Disabled,
}

impl Condition {
    /// Evaluates the condition, appending the categories that satisfied it.
    fn evaluate(&self, view: &Membership<'_>, beneficiary: &Beneficiary, matched: &mut Vec<String>) -> bool {
        match self {
            Self::Has(name) => {
                let present = view.contains(name);
                if present {
                    matched.push(name.to_string());
                }
                present
            }
            Self::AnyOf(names) => {
                let before = matched.len();
                matched.extend(names.iter().filter(|name| view.contains(name)).map(|name| name.to_string()));
                matched.len() > before
            }
            Self::Disabled => beneficiary.is_disabled(),
        }
    }
}

/// Evaluates AND-ed conditions, returning the matched categories when all hold.
fn evaluate_all(
    conditions: &[Condition],
    view: &Membership<'_>,
    beneficiary: &Beneficiary,
) -> Option<Vec<String>> {
    let mut matched = Vec::new();
    for condition in conditions {
        if !condition.evaluate(view, beneficiary, &mut matched) {
            return None;
        }
    }
    Some(matched)
}

/// An interaction category produced when all its conditions hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionRule {
    /// Category produced.
    pub name: &'static str,
    /// Conditions, all of which must hold.
    pub conditions: &'static [Condition],
    /// Whether the category lists the categories that triggered it.
    pub reports_triggers: bool,
}

impl InteractionRule {
    /// A rule whose category carries no triggering codes.
    pub const fn new(name: &'static str, conditions: &'static [Condition]) -> Self {
        Self {
            name,
            conditions,
            reports_triggers: false,
        }
    }

    /// A rule whose category lists the categories that triggered it.
    pub const fn reporting(name: &'static str, conditions: &'static [Condition]) -> Self {
        Self {
            name,
            conditions,
            reports_triggers: true,
        }
    }
}

/// How a count bucket is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketName {
    /// `{prefix}{count}`, e.g. `D3`.
    Numbered(&'static str),
    /// A fixed name, e.g. `D10P`.
    Fixed(&'static str),
}

/// An inclusive range of counts mapped to one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountBucket {
    /// Smallest count in the bucket.
    pub lower: usize,
    /// Largest count in the bucket; `None` for the open-ended top bucket.
    pub upper: Option<usize>,
    /// Category name.
    pub name: BucketName,
}

impl CountBucket {
    /// Counts `lower..=upper`, each named `{prefix}{count}`.
    pub const fn numbered(lower: usize, upper: usize, prefix: &'static str) -> Self {
        Self {
            lower,
            upper: Some(upper),
            name: BucketName::Numbered(prefix),
        }
    }

    /// Counts `lower..=upper` sharing one name.
    pub const fn between(lower: usize, upper: usize, name: &'static str) -> Self {
        Self {
            lower,
            upper: Some(upper),
            name: BucketName::Fixed(name),
        }
    }

    /// All counts from `lower` up.
    pub const fn at_least(lower: usize, name: &'static str) -> Self {
        Self {
            lower,
            upper: None,
            name: BucketName::Fixed(name),
        }
    }

    fn contains(&self, count: usize) -> bool {
        count >= self.lower && self.upper.map_or(true, |upper| count <= upper)
    }

    fn category(&self, count: usize) -> String {
        match self.name {
            BucketName::Numbered(prefix) => format!("{prefix}{count}"),
            BucketName::Fixed(name) => name.to_string(),
        }
    }
}

/// Index of the bucket containing `count`, if any.
pub fn bucket_index(buckets: &[CountBucket], count: usize) -> Option<usize> {
    buckets.iter().position(|bucket| bucket.contains(count))
}

/// A count category produced when its conditions hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRule {
    /// Conditions, all of which must hold.
    pub when: &'static [Condition],
    /// Buckets, ascending.
    pub buckets: &'static [CountBucket],
}

impl CountRule {
    /// An unconditional count.
    pub const fn always(buckets: &'static [CountBucket]) -> Self {
        Self { when: &[], buckets }
    }

    /// Returns the count category for `count`, if a bucket contains it.
    pub fn category(&self, count: usize) -> Option<String> {
        bucket_index(self.buckets, count).map(|index| self.buckets[index].category(count))
    }
}

/// Categories left out of the qualifying count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountExclusions {
    /// Name prefixes, e.g. `RXC`.
    pub prefixes: &'static [&'static str],
    /// Exact names.
    pub names: &'static [&'static str],
}

impl CountExclusions {
    /// Excludes nothing.
    pub const NONE: Self = Self {
        prefixes: &[],
        names: &[],
    };

    fn excludes(&self, name: &str) -> bool {
        self.names.contains(&name) || self.prefixes.iter().any(|prefix| name.starts_with(prefix))
    }
}

/// A synthesized category before weighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedCategory {
    /// Category name.
    pub name: String,
    /// Categories that triggered it, when the rule reports them.
    pub triggering_codes: Option<Vec<String>>,
}

impl DerivedCategory {
    /// A category with no triggering codes.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            triggering_codes: None,
        }
    }
}

/// Read-only view of a resolved set with groups expanded to their members.
#[derive(Debug, Default)]
pub struct Membership<'a> {
    names: HashSet<&'a str>,
    payment: Vec<&'a str>,
}

impl<'a> Membership<'a> {
    /// Builds the view.
    pub fn new(categories: &'a CategorySet) -> Self {
        let mut view = Self::default();
        for category in categories.iter() {
            view.names.insert(&category.name);
            match category.kind {
                CategoryKind::Disease | CategoryKind::Rx => view.payment.push(&category.name),
                CategoryKind::Group => {
                    for member in group_members(category) {
                        view.names.insert(member);
                        view.payment.push(member);
                    }
                }
                _ => {}
            }
        }
        view
    }

    /// Returns true if the category, or a group member of that name, is present.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Payment categories: disease and drug categories plus group members, in set order.
    pub fn payment_categories(&self) -> &[&'a str] {
        &self.payment
    }
}

fn group_members(category: &Category) -> impl Iterator<Item = &str> {
    category
        .triggering_codes
        .iter()
        .flatten()
        .map(String::as_str)
}

/// A model's interaction rules and count rules.
#[derive(Debug, Clone, Copy)]
pub struct InteractionEngine {
    /// Interaction rules, in reporting order.
    pub rules: &'static [InteractionRule],
    /// Count rules, evaluated after the interaction rules.
    pub counts: &'static [CountRule],
    /// Categories left out of the qualifying count.
    pub exclusions: CountExclusions,
}

impl InteractionEngine {
    /// Number of payment categories counted toward count buckets.
    pub fn qualifying_count(&self, view: &Membership<'_>) -> usize {
        view.payment_categories()
            .iter()
            .filter(|name| !self.exclusions.excludes(name))
            .count()
    }

    /// Derives interaction and count categories, in rule order.
    ///
    /// Never removes categories, and never derives a name already present.
    pub fn derive(&self, categories: &CategorySet, beneficiary: &Beneficiary) -> Vec<DerivedCategory> {
        let view = Membership::new(categories);
        let mut derived: Vec<DerivedCategory> = Vec::new();

        for rule in self.rules {
            if let Some(matched) = evaluate_all(rule.conditions, &view, beneficiary) {
                let triggering_codes = rule.reports_triggers.then_some(matched);
                derived.push(DerivedCategory {
                    name: rule.name.to_string(),
                    triggering_codes,
                });
            }
        }

        let count = self.qualifying_count(&view);
        for rule in self.counts {
            if evaluate_all(rule.when, &view, beneficiary).is_none() {
                continue;
            }
            if let Some(name) = rule.category(count) {
                derived.push(DerivedCategory::plain(name));
            }
        }

        let mut seen = HashSet::new();
        derived.retain(|category| !categories.contains(&category.name) && seen.insert(category.name.clone()));

        tracing::debug!(count, derived = derived.len(), "interactions derived");
        derived
    }
}
