//! # risk-engine
//!
//! Category determination and scoring for health-plan risk adjustment models.
//!
//! A scoring call turns a member's demographics and billing codes into a
//! weighted category set and a score:
//!
//! 1. [`Beneficiary`] derives the risk-model age, disability flags and weight column.
//! 2. The model's [`DemographicClassifier`] assigns an age/sex band and demographic interactions.
//! 3. [`CodeCategoryMapper`] maps codes to disease categories through the model's age/sex edits.
//! 4. [`HierarchyResolver`] applies suppression hierarchies, patch rules and groups.
//! 5. [`InteractionEngine`] adds interaction and count categories.
//! 6. [`RawScores`] sums coefficients and an [`Adjustment`] produces the final scores.
//!
//! Version differences live in [`ModelRules`] implementations selected by
//! [`rules_for`].
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use risk_engine::ScoringEngine;
//! use risk_loader::{discover_reference_files, ReferenceTables};
//! use risk_types::{MedicareAttributes, MemberAttributes, ModelVersion, ScoringRequest, Sex};
//!
//! let files = discover_reference_files("/data/risk", ModelVersion::MedicareV24, Some(2024))?;
//! let engine = ScoringEngine::new(Arc::new(ReferenceTables::load(&files)?), files.key);
//!
//! let request = ScoringRequest::with_age(
//!     Sex::Male,
//!     67,
//!     MemberAttributes::Medicare(MedicareAttributes::new("1", false, "CNA")),
//! )
//! .diagnoses(["E1169"]);
//!
//! let result = engine.score(&request)?;
//! println!("{} {:?}", result.score, result.category_list);
//! ```

#![warn(missing_docs)]

mod aggregate;
mod beneficiary;
mod category_set;
mod demographics;
mod engine;
mod error;
mod hierarchy;
mod interactions;
mod mapper;
pub mod rules;

pub use aggregate::{round_to, Adjustment, AdjustmentOp, AdjustmentStep, RawScores};
pub use beneficiary::{age_at, enrollment_months, Beneficiary, CommercialProfile, MedicareProfile, Profile};
pub use category_set::CategorySet;
pub use demographics::{
    find_band, AgeBand, BandNaming, BeneficiaryFlag, DemographicClassifier, DemographicInteraction,
    InteractionName,
};
pub use engine::ScoringEngine;
pub use error::{ConfigurationError, EngineResult, InputError, ScoringError};
pub use hierarchy::{apply_groups, group_plan, HierarchyAudit, HierarchyResolver, PatchRule};
pub use interactions::{
    bucket_index, BucketName, Condition, CountBucket, CountExclusions, CountRule, DerivedCategory,
    InteractionEngine, InteractionRule, Membership,
};
pub use mapper::{AgeSexEdit, CodeCategoryMapper, EditCondition, EditOutcome, MappedCode};
pub use rules::{rules_for, ModelRules};

// Re-export risk-types for convenience
pub use risk_types;
