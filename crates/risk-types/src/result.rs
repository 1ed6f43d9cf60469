//! Scoring results.

use indexmap::IndexMap;

use crate::enums::CategoryKind;
use crate::model::ModelKey;
use crate::request::ScoringRequest;

/// Reported detail for one category in a scoring result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryDetail {
    /// Weight applied for the member's population.
    pub coefficient: f64,
    /// Codes or categories that produced the category.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub triggering_codes: Option<Vec<String>>,
    /// Categories suppressed by this one (verbose only).
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub dropped_categories: Option<Vec<String>>,
    /// Category kind (verbose only).
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub kind: Option<CategoryKind>,
    /// Description (verbose only).
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
    /// Category number (verbose only).
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub number: Option<String>,
}

/// Which published factor an adjustment step applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FactorKind {
    /// Medicare coding intensity adjuster, multiplied in.
    CodingIntensity,
    /// Medicare normalization factor, divided out.
    Normalization,
    /// Commercial cost-sharing reduction multiplier.
    CostSharingReduction,
}

/// A factor applied to the raw scores, in application order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedFactor {
    /// Factor kind.
    pub kind: FactorKind,
    /// Factor value; 1.0 when no published value exists for the model year.
    pub value: f64,
    /// Decimal places kept after applying the factor.
    pub precision: u32,
}

/// Output of one scoring call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoringResult {
    /// Model version and year the member was scored under.
    pub model: ModelKey,
    /// Sum of all category weights.
    pub raw_score: f64,
    /// Sum of disease and disease interaction weights.
    pub disease_raw_score: f64,
    /// Sum of demographic weights.
    pub demographic_raw_score: f64,
    /// Adjusted total score.
    pub score: f64,
    /// Adjusted disease score.
    pub disease_score: f64,
    /// Adjusted demographic score.
    pub demographic_score: f64,
    /// Age used for categorization.
    pub risk_model_age: u32,
    /// Weight column used for coefficients.
    pub risk_model_population: String,
    /// Factors that turned the raw scores into the adjusted scores.
    #[cfg_attr(feature = "serde", serde(default))]
    pub adjustment_factors: Vec<AppliedFactor>,
    /// Months of enrollment used for commercial members.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub enrollment_months: Option<u32>,
    /// Final category names in scoring order.
    pub category_list: Vec<String>,
    /// Detail per category, keyed by name in scoring order.
    pub category_details: IndexMap<String, CategoryDetail>,
    /// The request as supplied.
    pub request: ScoringRequest,
}

impl ScoringResult {
    /// Returns true if the named category is in the final set.
    pub fn has_category(&self, name: &str) -> bool {
        self.category_details.contains_key(name)
    }

    /// Returns the detail for a category.
    pub fn detail(&self, name: &str) -> Option<&CategoryDetail> {
        self.category_details.get(name)
    }

    /// Returns the value of an applied factor.
    pub fn factor(&self, kind: FactorKind) -> Option<f64> {
        self.adjustment_factors
            .iter()
            .find(|factor| factor.kind == kind)
            .map(|factor| factor.value)
    }
}
