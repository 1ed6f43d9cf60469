//! Derived member attributes.
//!
//! A [`Beneficiary`] is built once per scoring call from the raw request and
//! holds everything the rules read: the risk-model age, the disability flags
//! and the weight column (risk-model population).

use chrono::{Datelike, NaiveDate};
use risk_types::{
    well_known, AgeSegment, EntitlementReason, MedicarePopulation, MemberAttributes, MetalLevel,
    ModelVersion, ScoringRequest, Sex,
};

use crate::error::InputError;

/// Derived scoring attributes of one member.
#[derive(Debug, Clone, PartialEq)]
pub struct Beneficiary {
    /// Member sex.
    pub sex: Sex,
    /// Age used for categorization.
    pub age: u32,
    /// Line-of-business specific attributes.
    pub profile: Profile,
}

/// Line-of-business specific derived attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    /// Medicare member.
    Medicare(MedicareProfile),
    /// Commercial member.
    Commercial(CommercialProfile),
}

/// Derived Medicare attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct MedicareProfile {
    /// Original reason for entitlement.
    pub orec: EntitlementReason,
    /// Medicaid enrollment.
    pub medicaid: bool,
    /// Supplied population tag.
    pub population: MedicarePopulation,
    /// Under 65 with a non-zero OREC.
    pub disabled: bool,
    /// Entitled by disability originally, no longer disabled.
    pub originally_disabled: bool,
    /// Weight column.
    pub risk_model_population: String,
}

/// Derived commercial attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct CommercialProfile {
    /// Plan metal level.
    pub metal_level: MetalLevel,
    /// Cost-sharing reduction indicator.
    pub csr_indicator: Option<u8>,
    /// Age segment.
    pub segment: AgeSegment,
    /// Whole months enrolled, capped at twelve.
    pub enrollment_months: u32,
    /// Weight column.
    pub risk_model_population: String,
}

impl Beneficiary {
    /// Derives scoring attributes from a request.
    ///
    /// `reference_date` is the date an age is measured at when the request
    /// carries a date of birth; a reference date in the request takes
    /// precedence.
    pub fn from_request(
        request: &ScoringRequest,
        version: ModelVersion,
        reference_date: Option<NaiveDate>,
    ) -> Result<Self, InputError> {
        let age = match (request.age, request.date_of_birth) {
            (Some(age), None) => age,
            (None, Some(date_of_birth)) => {
                let reference_date = request
                    .reference_date
                    .or(reference_date)
                    .ok_or(InputError::MissingReferenceDate { model: version })?;
                age_at(date_of_birth, reference_date)?
            }
            (Some(_), Some(_)) => return Err(InputError::ConflictingAge),
            (None, None) => return Err(InputError::MissingAge),
        };

        let profile = match (&request.attributes, version.is_medicare()) {
            (MemberAttributes::Medicare(attributes), true) => Profile::Medicare(
                MedicareProfile::derive(age, &attributes.orec, attributes.medicaid, &attributes.population)?,
            ),
            (MemberAttributes::Commercial(attributes), false) => {
                let segment = AgeSegment::for_age(age);
                Profile::Commercial(CommercialProfile {
                    metal_level: attributes.metal_level,
                    csr_indicator: attributes.csr_indicator,
                    segment,
                    enrollment_months: enrollment_months(attributes.enrollment_days),
                    risk_model_population: format!(
                        "{}_{}",
                        segment.code(),
                        attributes.metal_level.code()
                    ),
                })
            }
            (_, true) => {
                return Err(InputError::AttributesMismatch {
                    model: version,
                    expected: "medicare",
                })
            }
            (_, false) => {
                return Err(InputError::AttributesMismatch {
                    model: version,
                    expected: "commercial",
                })
            }
        };

        Ok(Self {
            sex: request.sex,
            age,
            profile,
        })
    }

    /// Returns the weight column for this member.
    pub fn risk_model_population(&self) -> &str {
        match &self.profile {
            Profile::Medicare(medicare) => &medicare.risk_model_population,
            Profile::Commercial(commercial) => &commercial.risk_model_population,
        }
    }

    /// Returns the Medicare attributes, if any.
    pub fn medicare(&self) -> Option<&MedicareProfile> {
        match &self.profile {
            Profile::Medicare(medicare) => Some(medicare),
            Profile::Commercial(_) => None,
        }
    }

    /// Returns the commercial attributes, if any.
    pub fn commercial(&self) -> Option<&CommercialProfile> {
        match &self.profile {
            Profile::Commercial(commercial) => Some(commercial),
            Profile::Medicare(_) => None,
        }
    }

    /// Returns true for a disabled Medicare member.
    pub fn is_disabled(&self) -> bool {
        self.medicare().is_some_and(|m| m.disabled)
    }

    /// Returns true for an originally disabled Medicare member.
    pub fn is_originally_disabled(&self) -> bool {
        self.medicare().is_some_and(|m| m.originally_disabled)
    }

    /// Returns true for a Medicare member enrolled in Medicaid.
    pub fn is_medicaid(&self) -> bool {
        self.medicare().is_some_and(|m| m.medicaid)
    }

    /// Returns true for a Medicare new enrollee.
    pub fn is_new_enrollee(&self) -> bool {
        self.medicare().is_some_and(|m| m.population.is_new_enrollee())
    }

    /// Returns the commercial age segment.
    pub fn segment(&self) -> Option<AgeSegment> {
        self.commercial().map(|c| c.segment)
    }
}

impl MedicareProfile {
    fn derive(age: u32, orec: &str, medicaid: bool, population: &str) -> Result<Self, InputError> {
        let orec = EntitlementReason::from_code(orec).ok_or_else(|| {
            InputError::UnknownEntitlementReason {
                code: orec.to_string(),
            }
        })?;
        let population = MedicarePopulation::from_code(population).ok_or_else(|| {
            InputError::UnknownPopulation {
                population: population.to_string(),
            }
        })?;

        let disabled = age < well_known::DISABLED_AGE_THRESHOLD && orec != EntitlementReason::OldAge;
        let originally_disabled = orec.is_originally_disabled() && !disabled;

        let risk_model_population = if population.is_new_enrollee() {
            new_enrollee_population(age, orec, medicaid)
        } else {
            population.code().to_string()
        };

        Ok(Self {
            orec,
            medicaid,
            population,
            disabled,
            originally_disabled,
            risk_model_population,
        })
    }
}

/// Weight column for a new enrollee, e.g. `NE_NMCAID_ORIGDIS`.
fn new_enrollee_population(age: u32, orec: EntitlementReason, medicaid: bool) -> String {
    let medicaid = if medicaid { "MCAID" } else { "NMCAID" };
    let origdis = if age >= well_known::DISABLED_AGE_THRESHOLD && orec == EntitlementReason::Disability {
        "ORIGDIS"
    } else {
        "NORIGDIS"
    };
    format!("NE_{medicaid}_{origdis}")
}

/// Whole years between a date of birth and a reference date.
pub fn age_at(date_of_birth: NaiveDate, reference_date: NaiveDate) -> Result<u32, InputError> {
    if date_of_birth > reference_date {
        return Err(InputError::BirthAfterReferenceDate {
            date_of_birth,
            reference_date,
        });
    }

    let mut years = reference_date.year() - date_of_birth.year();
    if (reference_date.month(), reference_date.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    // Non-negative: date_of_birth <= reference_date.
    Ok(years.max(0) as u32)
}

/// Enrollment months from days: partial months count as a month, capped at a year.
pub fn enrollment_months(days: u32) -> u32 {
    days.div_ceil(well_known::DAYS_PER_ENROLLMENT_MONTH)
        .min(well_known::MAX_ENROLLMENT_MONTHS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_types::{CommercialAttributes, MedicareAttributes};

    fn medicare_request(age: u32, orec: &str, medicaid: bool, population: &str) -> ScoringRequest {
        ScoringRequest::with_age(
            Sex::Male,
            age,
            MemberAttributes::Medicare(MedicareAttributes::new(orec, medicaid, population)),
        )
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_age_at() {
        assert_eq!(age_at(date(1957, 2, 1), date(2024, 2, 1)).unwrap(), 67);
        assert_eq!(age_at(date(1957, 2, 2), date(2024, 2, 1)).unwrap(), 66);
        assert_eq!(age_at(date(2024, 1, 15), date(2024, 2, 1)).unwrap(), 0);
        assert!(matches!(
            age_at(date(2024, 3, 1), date(2024, 2, 1)),
            Err(InputError::BirthAfterReferenceDate { .. })
        ));
    }

    #[test]
    fn test_originally_disabled() {
        let request = medicare_request(67, "1", false, "CNA");
        let beneficiary = Beneficiary::from_request(&request, ModelVersion::MedicareV24, None).unwrap();
        assert!(!beneficiary.is_disabled());
        assert!(beneficiary.is_originally_disabled());
        assert_eq!(beneficiary.risk_model_population(), "CNA");
    }

    #[test]
    fn test_disabled_under_65() {
        let request = medicare_request(50, "3", false, "CND");
        let beneficiary = Beneficiary::from_request(&request, ModelVersion::MedicareV28, None).unwrap();
        assert!(beneficiary.is_disabled());
        assert!(!beneficiary.is_originally_disabled());

        let request = medicare_request(50, "0", false, "CNA");
        let beneficiary = Beneficiary::from_request(&request, ModelVersion::MedicareV28, None).unwrap();
        assert!(!beneficiary.is_disabled());
    }

    #[test]
    fn test_new_enrollee_population() {
        let cases = [
            (67, "1", false, "NE_NMCAID_ORIGDIS"),
            (67, "1", true, "NE_MCAID_ORIGDIS"),
            (67, "3", false, "NE_NMCAID_NORIGDIS"),
            (60, "1", true, "NE_MCAID_NORIGDIS"),
        ];
        for (age, orec, medicaid, expected) in cases {
            let request = medicare_request(age, orec, medicaid, "NE");
            let beneficiary =
                Beneficiary::from_request(&request, ModelVersion::MedicareV24, None).unwrap();
            assert!(beneficiary.is_new_enrollee());
            assert_eq!(beneficiary.risk_model_population(), expected);
        }
    }

    #[test]
    fn test_invalid_medicare_attributes() {
        let request = medicare_request(70, "1", false, "XYZ");
        assert_eq!(
            Beneficiary::from_request(&request, ModelVersion::MedicareV24, None),
            Err(InputError::UnknownPopulation {
                population: "XYZ".to_string()
            })
        );

        let request = medicare_request(70, "9", false, "CNA");
        assert!(matches!(
            Beneficiary::from_request(&request, ModelVersion::MedicareV24, None),
            Err(InputError::UnknownEntitlementReason { .. })
        ));
    }

    #[test]
    fn test_age_source_validation() {
        let mut request = medicare_request(70, "0", false, "CNA");
        request.age = None;
        assert_eq!(
            Beneficiary::from_request(&request, ModelVersion::MedicareV24, None),
            Err(InputError::MissingAge)
        );

        request.date_of_birth = Some(date(1950, 6, 1));
        assert_eq!(
            Beneficiary::from_request(&request, ModelVersion::MedicareV24, None),
            Err(InputError::MissingReferenceDate {
                model: ModelVersion::MedicareV24
            })
        );

        let beneficiary =
            Beneficiary::from_request(&request, ModelVersion::MedicareV24, Some(date(2024, 2, 1)))
                .unwrap();
        assert_eq!(beneficiary.age, 73);

        request.age = Some(73);
        assert_eq!(
            Beneficiary::from_request(&request, ModelVersion::MedicareV24, None),
            Err(InputError::ConflictingAge)
        );
    }

    #[test]
    fn test_request_reference_date_takes_precedence() {
        let mut request = medicare_request(0, "0", false, "CNA");
        request.age = None;
        request.date_of_birth = Some(date(1959, 6, 1));
        request.reference_date = Some(date(2024, 7, 1));

        let beneficiary =
            Beneficiary::from_request(&request, ModelVersion::MedicareV24, Some(date(2024, 2, 1)))
                .unwrap();
        assert_eq!(beneficiary.age, 65);
    }

    #[test]
    fn test_commercial_profile() {
        let request = ScoringRequest::with_age(
            Sex::Female,
            1,
            MemberAttributes::Commercial(
                CommercialAttributes::new(MetalLevel::Bronze).with_enrollment_days(95),
            ),
        );
        let beneficiary =
            Beneficiary::from_request(&request, ModelVersion::CommercialV07, None).unwrap();
        let commercial = beneficiary.commercial().unwrap();
        assert_eq!(commercial.segment, AgeSegment::Infant);
        assert_eq!(commercial.enrollment_months, 4);
        assert_eq!(beneficiary.risk_model_population(), "Infant_bronze");
        assert!(!beneficiary.is_disabled());
    }

    #[test]
    fn test_attributes_mismatch() {
        let request = medicare_request(70, "0", false, "CNA");
        assert!(matches!(
            Beneficiary::from_request(&request, ModelVersion::CommercialV07, None),
            Err(InputError::AttributesMismatch { expected: "commercial", .. })
        ));
    }

    #[test]
    fn test_enrollment_months() {
        assert_eq!(enrollment_months(0), 0);
        assert_eq!(enrollment_months(1), 1);
        assert_eq!(enrollment_months(30), 1);
        assert_eq!(enrollment_months(31), 2);
        assert_eq!(enrollment_months(180), 6);
        assert_eq!(enrollment_months(365), 12);
    }
}
