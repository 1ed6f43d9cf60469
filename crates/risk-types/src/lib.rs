//! # risk-types
//!
//! Type definitions for health-plan risk adjustment scoring.
//!
//! This crate holds the plain data shared by the table loader, the scoring
//! engine and the command-line front end: member sex and category kinds,
//! model versions, scoring requests and scoring results.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!
//! ## Usage
//!
//! ```rust
//! use risk_types::{CategoryKind, ModelVersion, Sex};
//!
//! let version = ModelVersion::from_code("v28").unwrap();
//! assert_eq!(version, ModelVersion::MedicareV28);
//! assert!(version.is_medicare());
//!
//! assert_eq!(Sex::from_code("F"), Some(Sex::Female));
//! assert!(CategoryKind::DiseaseInteraction.is_disease_component());
//! ```

#![warn(missing_docs)]

mod category;
mod enums;
mod model;
mod request;
mod result;
pub mod well_known;

// Re-export all public types at crate root
pub use category::{Category, CategoryDefinition};
pub use enums::{
    AgeSegment, CategoryKind, CodeType, EntitlementReason, LineOfBusiness, MedicarePopulation,
    MetalLevel, Sex,
};
pub use model::{ModelKey, ModelVersion};
pub use request::{CommercialAttributes, MedicareAttributes, MemberAttributes, ScoringRequest};
pub use result::{AppliedFactor, CategoryDetail, FactorKind, ScoringResult};
