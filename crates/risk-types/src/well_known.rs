//! Well-known constants shared by the risk models.
//!
//! # Examples
//!
//! ```
//! use risk_types::well_known;
//!
//! assert_eq!(well_known::NO_CATEGORY, "NA");
//! assert_eq!(well_known::MEDICARE_REFERENCE_MONTH, 2);
//! ```

// =============================================================================
// Code mapping
// =============================================================================

/// Sentinel category an edit uses to mean "this code maps to nothing".
pub const NO_CATEGORY: &str = "NA";

// =============================================================================
// Medicare
// =============================================================================

/// Age below which a Medicare member with a non-zero OREC is disabled.
pub const DISABLED_AGE_THRESHOLD: u32 = 65;

/// Month of the Medicare age reference date (February 1 of the model year).
pub const MEDICARE_REFERENCE_MONTH: u32 = 2;

/// Day of the Medicare age reference date.
pub const MEDICARE_REFERENCE_DAY: u32 = 1;

/// Group segment name used by models without age segments.
pub const ALL_SEGMENTS: &str = "All";

// =============================================================================
// Commercial
// =============================================================================

/// Enrollment days assumed when a commercial request omits them.
pub const FULL_YEAR_ENROLLMENT_DAYS: u32 = 365;

/// Days counted as one enrollment month.
pub const DAYS_PER_ENROLLMENT_MONTH: u32 = 30;

/// Maximum enrollment months in a benefit year.
pub const MAX_ENROLLMENT_MONTHS: u32 = 12;
