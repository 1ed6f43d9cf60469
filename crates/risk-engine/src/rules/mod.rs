//! Per-version model rules.
//!
//! Each supported model version supplies one [`ModelRules`] value holding its
//! edit chain, demographic classifier, patch rules, interaction tables and
//! score adjustment. [`rules_for`] selects the value for a model key.

mod medicare;
mod v07;
mod v24;
mod v28;

use std::fmt;

use chrono::NaiveDate;
use risk_types::{ModelKey, ModelVersion};

use crate::aggregate::Adjustment;
use crate::beneficiary::Beneficiary;
use crate::category_set::CategorySet;
use crate::error::InputError;
use crate::hierarchy::PatchRule;
use crate::interactions::DerivedCategory;
use crate::mapper::AgeSexEdit;

pub use v07::CommercialV07Rules;
pub use v24::MedicareV24Rules;
pub use v28::MedicareV28Rules;

/// Version-specific behaviour plugged into the scoring pipeline.
pub trait ModelRules: Send + Sync + fmt::Debug {
    /// Model version and year the rules apply to.
    fn key(&self) -> ModelKey;

    /// Date an age is measured at when only a date of birth is supplied.
    fn age_reference_date(&self) -> Option<NaiveDate> {
        None
    }

    /// Ordered age/sex edit chain for diagnosis codes.
    fn edits(&self) -> &'static [AgeSexEdit];

    /// Demographic band and demographic interaction categories.
    fn classify_demographics(&self, beneficiary: &Beneficiary) -> Result<Vec<String>, InputError>;

    /// Whether a mapped category is scored for this member at all.
    fn admits_category(&self, _name: &str, _beneficiary: &Beneficiary) -> bool {
        true
    }

    /// Patch rules judged against the pre-resolution set; their targets are
    /// removed before the hierarchy walk and never suppress.
    fn patches(&self) -> &'static [PatchRule] {
        &[]
    }

    /// Segment key for group definitions.
    fn group_segment(&self, beneficiary: &Beneficiary) -> &'static str;

    /// Interaction and count categories for the resolved set.
    fn resolve_interactions(&self, categories: &CategorySet, beneficiary: &Beneficiary) -> Vec<DerivedCategory>;

    /// Complete category list for members scored without disease categories.
    ///
    /// Returns `None` for members that go through hierarchies and interactions.
    fn substitute_categories(
        &self,
        _beneficiary: &Beneficiary,
        _demographic: &[String],
        _diseases: &[String],
    ) -> Option<Vec<String>> {
        None
    }

    /// Adjustment turning raw sums into final scores.
    fn adjustment(&self, beneficiary: &Beneficiary) -> Adjustment;
}

/// Returns the rules for a model version and year.
pub fn rules_for(key: ModelKey) -> Box<dyn ModelRules> {
    match key.version {
        ModelVersion::MedicareV24 => Box::new(MedicareV24Rules::new(key.year)),
        ModelVersion::MedicareV28 => Box::new(MedicareV28Rules::new(key.year)),
        ModelVersion::CommercialV07 => Box::new(CommercialV07Rules::new(key.year)),
    }
}
