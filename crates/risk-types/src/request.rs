//! Scoring requests.

use chrono::NaiveDate;

use crate::enums::{MetalLevel, Sex};

/// Raw member attributes and codes for one scoring call.
///
/// Exactly one of `age` and `date_of_birth` must be supplied. When the date
/// of birth is given the age is computed against `reference_date`, which the
/// caller supplies (Medicare defaults to February 1 of the model year).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoringRequest {
    /// Member sex.
    pub sex: Sex,
    /// Age in whole years.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub age: Option<u32>,
    /// Date of birth.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub date_of_birth: Option<NaiveDate>,
    /// Date the age is measured at when `date_of_birth` is given.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub reference_date: Option<NaiveDate>,
    /// ICD-10 diagnosis codes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub diagnosis_codes: Vec<String>,
    /// National drug codes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ndc_codes: Vec<String>,
    /// Procedure codes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub procedure_codes: Vec<String>,
    /// Line-of-business specific attributes.
    pub attributes: MemberAttributes,
    /// Include bookkeeping fields in category details.
    #[cfg_attr(feature = "serde", serde(default))]
    pub verbose: bool,
}

impl ScoringRequest {
    /// Creates a request for a member of the given age with no codes.
    pub fn with_age(sex: Sex, age: u32, attributes: MemberAttributes) -> Self {
        Self {
            sex,
            age: Some(age),
            date_of_birth: None,
            reference_date: None,
            diagnosis_codes: Vec::new(),
            ndc_codes: Vec::new(),
            procedure_codes: Vec::new(),
            attributes,
            verbose: false,
        }
    }

    /// Adds diagnosis codes.
    pub fn diagnoses<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.diagnosis_codes.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Adds national drug codes.
    pub fn ndcs<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ndc_codes.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Adds procedure codes.
    pub fn procedures<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.procedure_codes.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Sets the verbose flag.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Attributes that only apply to one line of business.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "line_of_business", rename_all = "snake_case")
)]
pub enum MemberAttributes {
    /// Medicare Advantage member.
    Medicare(MedicareAttributes),
    /// Commercial (ACA) member.
    Commercial(CommercialAttributes),
}

/// Medicare member attributes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MedicareAttributes {
    /// Original reason for entitlement code.
    pub orec: String,
    /// Medicaid enrollment.
    #[cfg_attr(feature = "serde", serde(default))]
    pub medicaid: bool,
    /// Population tag (`CNA`, `INS`, `NE`, ...).
    pub population: String,
}

impl MedicareAttributes {
    /// Creates Medicare attributes.
    pub fn new(orec: impl Into<String>, medicaid: bool, population: impl Into<String>) -> Self {
        Self {
            orec: orec.into(),
            medicaid,
            population: population.into(),
        }
    }
}

/// Commercial member attributes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommercialAttributes {
    /// Plan metal level.
    pub metal_level: MetalLevel,
    /// Cost-sharing reduction indicator.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub csr_indicator: Option<u8>,
    /// Days enrolled in the benefit year.
    #[cfg_attr(feature = "serde", serde(default = "full_year_days"))]
    pub enrollment_days: u32,
}

#[cfg(feature = "serde")]
fn full_year_days() -> u32 {
    crate::well_known::FULL_YEAR_ENROLLMENT_DAYS
}

impl CommercialAttributes {
    /// Creates commercial attributes for a full year of enrollment.
    pub fn new(metal_level: MetalLevel) -> Self {
        Self {
            metal_level,
            csr_indicator: None,
            enrollment_days: crate::well_known::FULL_YEAR_ENROLLMENT_DAYS,
        }
    }

    /// Sets the CSR indicator.
    pub fn with_csr(mut self, indicator: u8) -> Self {
        self.csr_indicator = Some(indicator);
        self
    }

    /// Sets the enrollment days.
    pub fn with_enrollment_days(mut self, days: u32) -> Self {
        self.enrollment_days = days;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ScoringRequest::with_age(
            Sex::Female,
            70,
            MemberAttributes::Medicare(MedicareAttributes::new("0", true, "CFA")),
        )
        .diagnoses(["E1169", "I509"])
        .ndcs(["00002143380"])
        .verbose(true);

        assert_eq!(request.age, Some(70));
        assert_eq!(request.diagnosis_codes.len(), 2);
        assert_eq!(request.ndc_codes, vec!["00002143380"]);
        assert!(request.procedure_codes.is_empty());
        assert!(request.verbose);
    }

    #[test]
    fn test_commercial_attributes_defaults() {
        let attributes = CommercialAttributes::new(MetalLevel::Gold);
        assert_eq!(attributes.enrollment_days, 365);
        assert!(attributes.csr_indicator.is_none());

        let attributes = attributes.with_csr(3).with_enrollment_days(90);
        assert_eq!(attributes.csr_indicator, Some(3));
        assert_eq!(attributes.enrollment_days, 90);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_commercial_request_from_json() {
        let json = r#"{
            "sex": "F",
            "date_of_birth": "1990-05-17",
            "reference_date": "2024-12-31",
            "attributes": {
                "line_of_business": "commercial",
                "metal_level": "silver",
                "csr_indicator": 2
            }
        }"#;

        let request: ScoringRequest = serde_json::from_str(json).unwrap();
        assert!(request.age.is_none());
        assert_eq!(
            request.date_of_birth,
            NaiveDate::from_ymd_opt(1990, 5, 17)
        );
        match request.attributes {
            MemberAttributes::Commercial(ref commercial) => {
                assert_eq!(commercial.metal_level, MetalLevel::Silver);
                assert_eq!(commercial.csr_indicator, Some(2));
                assert_eq!(commercial.enrollment_days, 365);
            }
            MemberAttributes::Medicare(_) => panic!("expected commercial attributes"),
        }
    }
}
