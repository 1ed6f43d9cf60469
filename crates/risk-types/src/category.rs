//! Scoring categories.

use crate::enums::CategoryKind;
use crate::result::CategoryDetail;

/// Metadata for a category, as published in the category definition table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryDefinition {
    /// Category kind.
    pub kind: CategoryKind,
    /// Human-readable description.
    pub description: String,
    /// Published category number, when the model assigns one.
    pub number: Option<String>,
}

impl CategoryDefinition {
    /// Creates a definition without a category number.
    pub fn new(kind: CategoryKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            number: None,
        }
    }

    /// Sets the category number.
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }
}

/// A category that fired for one member, with its resolved coefficient.
///
/// Categories are created per scoring call and carry the bookkeeping needed
/// for the audit trail: the codes (or categories) that triggered them and the
/// categories they suppressed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Category {
    /// Unique category name.
    pub name: String,
    /// Category kind.
    pub kind: CategoryKind,
    /// Human-readable description.
    pub description: String,
    /// Published category number.
    pub number: Option<String>,
    /// Weight for the member's risk-model population.
    pub coefficient: f64,
    /// Codes or categories that produced this category, in first-seen order.
    pub triggering_codes: Option<Vec<String>>,
    /// Categories removed because this one was present.
    pub dropped_categories: Option<Vec<String>>,
}

impl Category {
    /// Creates a category from its definition and coefficient.
    pub fn new(name: impl Into<String>, definition: &CategoryDefinition, coefficient: f64) -> Self {
        Self {
            name: name.into(),
            kind: definition.kind,
            description: definition.description.clone(),
            number: definition.number.clone(),
            coefficient,
            triggering_codes: None,
            dropped_categories: None,
        }
    }

    /// Records a triggering code, ignoring duplicates.
    pub fn add_triggering_code(&mut self, code: impl Into<String>) {
        let code = code.into();
        let codes = self.triggering_codes.get_or_insert_with(Vec::new);
        if !codes.contains(&code) {
            codes.push(code);
        }
    }

    /// Records a dropped category, ignoring duplicates.
    pub fn add_dropped_category(&mut self, name: impl Into<String>) {
        let name = name.into();
        let dropped = self.dropped_categories.get_or_insert_with(Vec::new);
        if !dropped.contains(&name) {
            dropped.push(name);
        }
    }

    /// Builds the reported detail for this category.
    ///
    /// Bookkeeping fields (kind, description, number, dropped categories) are
    /// only included when `verbose` is set.
    pub fn detail(&self, verbose: bool) -> CategoryDetail {
        CategoryDetail {
            coefficient: self.coefficient,
            triggering_codes: self.triggering_codes.clone(),
            dropped_categories: if verbose {
                self.dropped_categories.clone()
            } else {
                None
            },
            kind: verbose.then_some(self.kind),
            description: if verbose {
                Some(self.description.clone())
            } else {
                None
            },
            number: if verbose { self.number.clone() } else { None },
        }
    }
}
