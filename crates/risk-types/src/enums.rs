//! Risk adjustment enumeration types.
//!
//! Coded values that appear in requests and reference tables: member sex,
//! category kinds, code types, Medicare populations and entitlement reasons,
//! and the commercial metal levels and age segments.

use std::fmt;

/// Sex of a member as used by the risk models.
///
/// # Examples
///
/// ```
/// use risk_types::Sex;
///
/// assert_eq!(Sex::from_code("M"), Some(Sex::Male));
/// assert_eq!(Sex::Female.label(), "Female");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sex {
    /// Male ("M").
    #[cfg_attr(feature = "serde", serde(rename = "M"))]
    Male,
    /// Female ("F").
    #[cfg_attr(feature = "serde", serde(rename = "F"))]
    Female,
}

impl Sex {
    /// Parses the single-letter code used in requests and category names.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M" => Some(Self::Male),
            "F" => Some(Self::Female),
            _ => None,
        }
    }

    /// Returns the single-letter code ("M" or "F").
    pub fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }

    /// Returns the word used in interaction category names ("Male" or "Female").
    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Kind of a scoring category.
///
/// The kind decides which subtotal a category's weight contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CategoryKind {
    /// Age/sex band.
    Demographic,
    /// Condition category mapped from a code.
    Disease,
    /// Drug category mapped from an NDC or procedure code.
    Rx,
    /// Co-occurrence of conditions, or of a condition and a member flag.
    DiseaseInteraction,
    /// Interaction between member flags only.
    DemographicInteraction,
    /// Synthetic category replacing a set of member categories.
    Group,
    /// Count of payment categories.
    Count,
}

impl CategoryKind {
    /// Parses the kind string used in category definition files.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "demographic" => Some(Self::Demographic),
            "disease" => Some(Self::Disease),
            "rx" => Some(Self::Rx),
            "disease_interaction" => Some(Self::DiseaseInteraction),
            "demographic_interaction" => Some(Self::DemographicInteraction),
            "group" => Some(Self::Group),
            "count" => Some(Self::Count),
            _ => None,
        }
    }

    /// Returns the kind string used in category definition files.
    pub fn code(self) -> &'static str {
        match self {
            Self::Demographic => "demographic",
            Self::Disease => "disease",
            Self::Rx => "rx",
            Self::DiseaseInteraction => "disease_interaction",
            Self::DemographicInteraction => "demographic_interaction",
            Self::Group => "group",
            Self::Count => "count",
        }
    }

    /// Returns true if the weight counts towards the disease subtotal.
    ///
    /// Drug, group and count categories only count towards the total.
    pub fn is_disease_component(self) -> bool {
        matches!(self, Self::Disease | Self::DiseaseInteraction)
    }

    /// Returns true if the weight counts towards the demographic subtotal.
    pub fn is_demographic_component(self) -> bool {
        matches!(self, Self::Demographic | Self::DemographicInteraction)
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Type of an external billing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CodeType {
    /// ICD-10-CM diagnosis code.
    Diagnosis,
    /// National Drug Code.
    Ndc,
    /// HCPCS/CPT procedure code.
    Procedure,
}

impl CodeType {
    /// All code types in mapping order.
    pub const ALL: [CodeType; 3] = [Self::Diagnosis, Self::Ndc, Self::Procedure];
}

/// Line of business a model version belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LineOfBusiness {
    /// CMS Medicare Advantage.
    Medicare,
    /// HHS commercial (ACA individual and small group).
    Commercial,
}

impl LineOfBusiness {
    /// Returns the directory name used for reference tables.
    pub fn code(self) -> &'static str {
        match self {
            Self::Medicare => "medicare",
            Self::Commercial => "commercial",
        }
    }
}

/// Original reason for Medicare entitlement (OREC).
///
/// # Examples
///
/// ```
/// use risk_types::EntitlementReason;
///
/// let orec = EntitlementReason::from_code("1").unwrap();
/// assert_eq!(orec, EntitlementReason::Disability);
/// assert!(orec.is_originally_disabled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntitlementReason {
    /// Old age and survivors insurance ("0").
    OldAge,
    /// Disability insurance benefits ("1").
    Disability,
    /// End-stage renal disease ("2").
    EndStageRenalDisease,
    /// Both disability and end-stage renal disease ("3").
    DisabilityAndEsrd,
}

impl EntitlementReason {
    /// Parses the OREC code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "0" => Some(Self::OldAge),
            "1" => Some(Self::Disability),
            "2" => Some(Self::EndStageRenalDisease),
            "3" => Some(Self::DisabilityAndEsrd),
            _ => None,
        }
    }

    /// Returns the OREC code.
    pub fn code(self) -> &'static str {
        match self {
            Self::OldAge => "0",
            Self::Disability => "1",
            Self::EndStageRenalDisease => "2",
            Self::DisabilityAndEsrd => "3",
        }
    }

    /// Returns true if entitlement was originally due to disability.
    pub fn is_originally_disabled(self) -> bool {
        matches!(self, Self::Disability | Self::DisabilityAndEsrd)
    }
}

/// Medicare population tag supplied with a request.
///
/// The tag selects the weight column; `NewEnrollee` is refined into one of
/// four new-enrollee columns from the member's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MedicarePopulation {
    /// Community, non-dual, aged.
    CommunityNonDualAged,
    /// Community, non-dual, disabled.
    CommunityNonDualDisabled,
    /// Community, full benefit dual, aged.
    CommunityFullDualAged,
    /// Community, full benefit dual, disabled.
    CommunityFullDualDisabled,
    /// Community, partial benefit dual, aged.
    CommunityPartialDualAged,
    /// Community, partial benefit dual, disabled.
    CommunityPartialDualDisabled,
    /// Long-term institutional.
    Institutional,
    /// New enrollee.
    NewEnrollee,
}

impl MedicarePopulation {
    /// Parses a population tag such as `CNA` or `NE`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "CNA" => Some(Self::CommunityNonDualAged),
            "CND" => Some(Self::CommunityNonDualDisabled),
            "CFA" => Some(Self::CommunityFullDualAged),
            "CFD" => Some(Self::CommunityFullDualDisabled),
            "CPA" => Some(Self::CommunityPartialDualAged),
            "CPD" => Some(Self::CommunityPartialDualDisabled),
            "INS" => Some(Self::Institutional),
            "NE" => Some(Self::NewEnrollee),
            _ => None,
        }
    }

    /// Returns the population tag.
    pub fn code(self) -> &'static str {
        match self {
            Self::CommunityNonDualAged => "CNA",
            Self::CommunityNonDualDisabled => "CND",
            Self::CommunityFullDualAged => "CFA",
            Self::CommunityFullDualDisabled => "CFD",
            Self::CommunityPartialDualAged => "CPA",
            Self::CommunityPartialDualDisabled => "CPD",
            Self::Institutional => "INS",
            Self::NewEnrollee => "NE",
        }
    }

    /// Returns true for the new-enrollee population.
    pub fn is_new_enrollee(self) -> bool {
        self == Self::NewEnrollee
    }
}

/// Metal level of a commercial plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MetalLevel {
    /// Platinum.
    Platinum,
    /// Gold.
    Gold,
    /// Silver.
    Silver,
    /// Bronze.
    Bronze,
    /// Catastrophic.
    Catastrophic,
}

impl MetalLevel {
    /// Parses a metal level, ignoring case.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "platinum" => Some(Self::Platinum),
            "gold" => Some(Self::Gold),
            "silver" => Some(Self::Silver),
            "bronze" => Some(Self::Bronze),
            "catastrophic" => Some(Self::Catastrophic),
            _ => None,
        }
    }

    /// Returns the lowercase code used as a weight column.
    pub fn code(self) -> &'static str {
        match self {
            Self::Platinum => "platinum",
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Bronze => "bronze",
            Self::Catastrophic => "catastrophic",
        }
    }
}

/// Commercial age segment, each with its own weights and rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgeSegment {
    /// Age 21 and over.
    Adult,
    /// Age 2 through 20.
    Child,
    /// Age 0 and 1.
    Infant,
}

impl AgeSegment {
    /// Returns the segment for a risk-model age.
    pub fn for_age(age: u32) -> Self {
        match age {
            0..=1 => Self::Infant,
            2..=20 => Self::Child,
            _ => Self::Adult,
        }
    }

    /// Parses the segment prefix used in weight and group files.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Adult" => Some(Self::Adult),
            "Child" => Some(Self::Child),
            "Infant" => Some(Self::Infant),
            _ => None,
        }
    }

    /// Returns the segment prefix.
    pub fn code(self) -> &'static str {
        match self {
            Self::Adult => "Adult",
            Self::Child => "Child",
            Self::Infant => "Infant",
        }
    }
}

impl fmt::Display for AgeSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
