//! Risk model versions.

use std::fmt;

use crate::enums::LineOfBusiness;

/// A published risk model version.
///
/// # Examples
///
/// ```
/// use risk_types::{LineOfBusiness, ModelVersion};
///
/// let version = ModelVersion::CommercialV07;
/// assert_eq!(version.code(), "v07");
/// assert_eq!(version.line_of_business(), LineOfBusiness::Commercial);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelVersion {
    /// CMS-HCC V24.
    #[cfg_attr(feature = "serde", serde(rename = "v24"))]
    MedicareV24,
    /// CMS-HCC V28.
    #[cfg_attr(feature = "serde", serde(rename = "v28"))]
    MedicareV28,
    /// HHS-HCC V07.
    #[cfg_attr(feature = "serde", serde(rename = "v07"))]
    CommercialV07,
}

impl ModelVersion {
    /// All supported versions.
    pub const ALL: [ModelVersion; 3] = [Self::MedicareV24, Self::MedicareV28, Self::CommercialV07];

    /// Parses a version code such as `v24`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "v24" => Some(Self::MedicareV24),
            "v28" => Some(Self::MedicareV28),
            "v07" => Some(Self::CommercialV07),
            _ => None,
        }
    }

    /// Returns the version code, also the reference-table directory name.
    pub fn code(self) -> &'static str {
        match self {
            Self::MedicareV24 => "v24",
            Self::MedicareV28 => "v28",
            Self::CommercialV07 => "v07",
        }
    }

    /// Returns the line of business this version scores.
    pub fn line_of_business(self) -> LineOfBusiness {
        match self {
            Self::MedicareV24 | Self::MedicareV28 => LineOfBusiness::Medicare,
            Self::CommercialV07 => LineOfBusiness::Commercial,
        }
    }

    /// Returns true for the Medicare versions.
    pub fn is_medicare(self) -> bool {
        self.line_of_business() == LineOfBusiness::Medicare
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Identifies one loaded set of reference tables: a version and a model year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelKey {
    /// Model version.
    pub version: ModelVersion,
    /// Payment (model) year.
    pub year: u16,
}

impl ModelKey {
    /// Creates a new key.
    pub fn new(version: ModelVersion, year: u16) -> Self {
        Self { version, year }
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.version, self.year)
    }
}
