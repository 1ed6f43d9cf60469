//! Insertion-ordered, duplicate-free category collection.

use indexmap::IndexMap;
use risk_types::{Category, CategoryKind};

/// Categories for one scoring call, keyed by name in insertion order.
///
/// Removal keeps the relative order of the remaining categories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySet {
    categories: IndexMap<String, Category>,
}

impl CategorySet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a category. Returns false, leaving the set unchanged, if the name is taken.
    pub fn insert(&mut self, category: Category) -> bool {
        if self.categories.contains_key(&category.name) {
            return false;
        }
        self.categories.insert(category.name.clone(), category);
        true
    }

    /// Returns true if a category with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    /// Gets a category by name.
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    /// Gets a category by name for update.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories.get_mut(name)
    }

    /// Removes a category, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<Category> {
        self.categories.shift_remove(name)
    }

    /// Keeps only the categories for which the predicate holds.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Category) -> bool,
    {
        self.categories.retain(|_, category| keep(category));
    }

    /// Iterates categories in order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    /// Iterates category names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Iterates names of categories of one kind.
    pub fn names_of_kind(&self, kind: CategoryKind) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(move |category| category.kind == kind)
            .map(|category| category.name.as_str())
    }

    /// Returns the number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl IntoIterator for CategorySet {
    type Item = Category;
    type IntoIter = indexmap::map::IntoValues<String, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.into_values()
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut set = Self::new();
        for category in iter {
            set.insert(category);
        }
        set
    }
}
