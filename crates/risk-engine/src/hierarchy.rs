//! Hierarchy suppression and grouping.
//!
//! Resolution runs in two phases. The first phase walks the hierarchy table in
//! its published order over the frozen input and decides every removal; a
//! category removed earlier in the walk no longer suppresses anything. The
//! second phase filters the set and records each removal on its suppressor.
//! Versioned patch rules are judged against the pre-resolution set before the
//! walk; a patched category neither suppresses nor is suppressed. Finally
//! groups replace their member categories.

use std::collections::HashSet;

use indexmap::IndexMap;
use risk_types::Category;

use crate::category_set::CategorySet;
use crate::error::EngineResult;

/// Drop `target` unless one of `requires_any_of` was present before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchRule {
    /// Category the rule may drop.
    pub target: &'static str,
    /// Categories whose presence keeps the target.
    pub requires_any_of: &'static [&'static str],
}

/// Record of what hierarchy resolution and grouping removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HierarchyAudit {
    /// Suppressor -> categories it removed, in application order.
    pub suppressed: IndexMap<String, Vec<String>>,
    /// Categories removed by patch rules.
    pub patched: Vec<String>,
    /// Group -> member categories it absorbed.
    pub grouped: IndexMap<String, Vec<String>>,
}

impl HierarchyAudit {
    /// Returns true if nothing was removed.
    pub fn is_empty(&self) -> bool {
        self.suppressed.is_empty() && self.patched.is_empty() && self.grouped.is_empty()
    }
}

/// Applies a model's hierarchy table and patch rules.
pub struct HierarchyResolver<'a> {
    hierarchy: &'a IndexMap<String, Vec<String>>,
    patches: &'a [PatchRule],
}

impl<'a> HierarchyResolver<'a> {
    /// Creates a resolver.
    pub fn new(hierarchy: &'a IndexMap<String, Vec<String>>, patches: &'a [PatchRule]) -> Self {
        Self { hierarchy, patches }
    }

    /// Decides removals without touching the set: suppressor -> removed categories.
    ///
    /// Patch targets are excluded from the walk.
    pub fn suppression_plan(&self, categories: &CategorySet) -> IndexMap<String, Vec<String>> {
        let patched = self.patch_plan(categories);
        self.walk(categories, &patched)
    }

    /// Resolves hierarchies, returning the survivors and an audit trail.
    ///
    /// Patch targets are removed first and take no part in suppression.
    /// Suppressors that survive carry their removals in `dropped_categories`.
    pub fn apply_hierarchies(&self, mut categories: CategorySet) -> (CategorySet, HierarchyAudit) {
        let patched = self.patch_plan(&categories);
        let plan = self.walk(&categories, &patched);

        for target in &patched {
            categories.remove(target);
        }
        for (suppressor, targets) in &plan {
            for target in targets {
                categories.remove(target);
            }
            if let Some(category) = categories.get_mut(suppressor) {
                for target in targets {
                    category.add_dropped_category(target.clone());
                }
            }
        }

        let audit = HierarchyAudit {
            suppressed: plan,
            patched,
            grouped: IndexMap::new(),
        };
        (categories, audit)
    }

    /// Patch targets to drop, judged against the pre-resolution set.
    fn patch_plan(&self, before: &CategorySet) -> Vec<String> {
        self.patches
            .iter()
            .filter(|patch| before.contains(patch.target))
            .filter(|patch| !patch.requires_any_of.iter().any(|name| before.contains(name)))
            .map(|patch| patch.target.to_string())
            .collect()
    }

    fn walk(&self, categories: &CategorySet, patched: &[String]) -> IndexMap<String, Vec<String>> {
        let mut removed: HashSet<&str> = patched.iter().map(String::as_str).collect();
        let mut plan: IndexMap<String, Vec<String>> = IndexMap::new();

        for (suppressor, targets) in self.hierarchy {
            if !categories.contains(suppressor) || removed.contains(suppressor.as_str()) {
                continue;
            }
            for target in targets {
                if target == suppressor
                    || !categories.contains(target)
                    || removed.contains(target.as_str())
                {
                    continue;
                }
                removed.insert(target);
                plan.entry(suppressor.clone()).or_default().push(target.clone());
            }
        }

        plan
    }
}

/// Decides group replacements: group -> members present, in set order.
pub fn group_plan(
    categories: &CategorySet,
    groups: &IndexMap<String, String>,
) -> IndexMap<String, Vec<String>> {
    let mut plan: IndexMap<String, Vec<String>> = IndexMap::new();
    for name in categories.names() {
        if let Some(group) = groups.get(name) {
            plan.entry(group.clone()).or_default().push(name.to_string());
        }
    }
    plan
}

/// Replaces group members with their group category.
///
/// `make_group` builds the category for a group name; the group's triggering
/// codes and dropped categories are the members it absorbed.
pub fn apply_groups<F>(
    mut categories: CategorySet,
    groups: &IndexMap<String, String>,
    audit: &mut HierarchyAudit,
    mut make_group: F,
) -> EngineResult<CategorySet>
where
    F: FnMut(&str) -> EngineResult<Category>,
{
    let plan = group_plan(&categories, groups);

    for (group, members) in &plan {
        for member in members {
            categories.remove(member);
        }

        if !categories.contains(group) {
            categories.insert(make_group(group)?);
        }
        if let Some(category) = categories.get_mut(group) {
            for member in members {
                category.add_triggering_code(member.clone());
                category.add_dropped_category(member.clone());
            }
        }
    }

    audit.grouped = plan;
    Ok(categories)
}
