//! Scoring errors.

use chrono::NaiveDate;
use risk_types::ModelVersion;
use thiserror::Error;

/// The request cannot be scored as given.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Neither age nor date of birth was supplied.
    #[error("Either age or date of birth must be supplied")]
    MissingAge,

    /// Both age and date of birth were supplied.
    #[error("Only one of age and date of birth may be supplied")]
    ConflictingAge,

    /// Date of birth supplied but the model has no reference date and the request gave none.
    #[error("Date of birth requires a reference date for {model}")]
    MissingReferenceDate {
        /// Model being scored.
        model: ModelVersion,
    },

    /// Date of birth falls after the reference date.
    #[error("Date of birth {date_of_birth} is after reference date {reference_date}")]
    BirthAfterReferenceDate {
        /// Supplied date of birth.
        date_of_birth: NaiveDate,
        /// Reference date the age is measured at.
        reference_date: NaiveDate,
    },

    /// No demographic band contains the age.
    #[error("Age {age} is outside all demographic bands")]
    AgeOutsideBands {
        /// Risk-model age.
        age: u32,
    },

    /// Population tag is not one the model knows.
    #[error("Unrecognized population: {population}")]
    UnknownPopulation {
        /// Supplied tag.
        population: String,
    },

    /// Original reason for entitlement code is not valid.
    #[error("Unrecognized entitlement reason code: {code}")]
    UnknownEntitlementReason {
        /// Supplied code.
        code: String,
    },

    /// Attributes belong to the other line of business.
    #[error("{model} requires {expected} member attributes")]
    AttributesMismatch {
        /// Model being scored.
        model: ModelVersion,
        /// Line of business the model expects.
        expected: &'static str,
    },
}

/// Reference tables do not cover a category the rules produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No weight for a category in the member's population column.
    #[error("No weight for category {category} in population {population}")]
    MissingWeight {
        /// Category name.
        category: String,
        /// Population column.
        population: String,
    },

    /// No definition for a category.
    #[error("Category {category} is not defined")]
    MissingCategory {
        /// Category name.
        category: String,
    },
}

/// Errors returned by [`ScoringEngine::score`](crate::ScoringEngine::score).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    /// Invalid request.
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    /// Reference tables and rules disagree.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Result type for scoring operations.
pub type EngineResult<T> = Result<T, ScoringError>;
