//! End-to-end scoring scenarios over small fixture tables.

mod common;

use chrono::NaiveDate;
use common::*;
use risk_engine::{round_to, ConfigurationError, InputError, ScoringError};
use risk_types::{
    AppliedFactor, CommercialAttributes, FactorKind, MemberAttributes, MetalLevel, ModelVersion,
    Sex,
};

// =============================================================================
// Medicare V24
// =============================================================================

#[test]
fn test_v24_originally_disabled_member() {
    let engine = engine(medicare_v24_tables(2024), ModelVersion::MedicareV24, 2024);
    let request = medicare_request(Sex::Male, 67, "1", "CNA").diagnoses(["E11.69"]);

    let result = engine.score(&request).unwrap();

    assert_eq!(
        result.category_list,
        vec!["M65_69", "OriginallyDisabled_Male", "HCC18", "D1"]
    );
    assert_eq!(result.risk_model_age, 67);
    assert_eq!(result.risk_model_population, "CNA");
    assert_close(result.raw_score, 0.852);
    assert_close(result.demographic_raw_score, 0.55);
    assert_close(result.disease_raw_score, 0.302);
    // 0.852 * 0.941 = 0.8017, / 1.146 = 0.6996
    assert_close(result.score, 0.6996);
    assert_eq!(
        result.adjustment_factors,
        vec![
            AppliedFactor { kind: FactorKind::CodingIntensity, value: 0.941, precision: 4 },
            AppliedFactor { kind: FactorKind::Normalization, value: 1.146, precision: 4 },
        ]
    );
    assert_eq!(result.enrollment_months, None);
    assert_eq!(
        result.detail("HCC18").unwrap().triggering_codes,
        Some(vec!["E1169".to_string()])
    );
}

#[test]
fn test_v24_interaction_and_count() {
    let engine = engine(medicare_v24_tables(2024), ModelVersion::MedicareV24, 2024);
    let request = medicare_request(Sex::Female, 86, "0", "CNA").diagnoses(["E1169", "I509"]);

    let result = engine.score(&request).unwrap();

    assert_eq!(
        result.category_list,
        vec!["F85_89", "HCC18", "HCC85", "DIABETES_CHF", "D2"]
    );
    assert_close(result.raw_score, 1.254);
    assert_close(result.score, 1.0297);
}

#[test]
fn test_v24_sex_edit() {
    let engine = engine(medicare_v24_tables(2024), ModelVersion::MedicareV24, 2024);

    let female = engine
        .score(&medicare_request(Sex::Female, 66, "0", "CNA").diagnoses(["D66"]))
        .unwrap();
    assert!(female.has_category("HCC48"));
    assert!(!female.has_category("HCC46"));

    let male = engine
        .score(&medicare_request(Sex::Male, 66, "0", "CNA").diagnoses(["D66"]))
        .unwrap();
    assert!(male.has_category("HCC46"));
    assert!(!male.has_category("HCC48"));
}

#[test]
fn test_v24_hierarchy_records_dropped_categories() {
    let engine = engine(medicare_v24_tables(2024), ModelVersion::MedicareV24, 2024);
    let request = medicare_request(Sex::Female, 66, "0", "CNA")
        .diagnoses(["E119", "E1169", "E1110"])
        .verbose(true);

    let result = engine.score(&request).unwrap();

    assert_eq!(result.category_list, vec!["F65_69", "HCC17", "D1"]);
    let detail = result.detail("HCC17").unwrap();
    assert_eq!(
        detail.dropped_categories,
        Some(vec!["HCC18".to_string(), "HCC19".to_string()])
    );
    assert!(detail.description.is_some());

    let quiet = engine.score(&request.clone().verbose(false)).unwrap();
    assert!(quiet.detail("HCC17").unwrap().dropped_categories.is_none());
    assert_eq!(quiet.score, result.score);
}

#[test]
fn test_v24_unknown_and_sentinel_codes_ignored() {
    let engine = engine(medicare_v24_tables(2024), ModelVersion::MedicareV24, 2024);
    let request = medicare_request(Sex::Male, 67, "0", "CNA").diagnoses(["Z0000", "XYZ123"]);

    let result = engine.score(&request).unwrap();

    assert_eq!(result.category_list, vec!["M65_69"]);
    assert_close(result.disease_raw_score, 0.0);
}

#[test]
fn test_v24_new_enrollee() {
    let engine = engine(medicare_v24_tables(2024), ModelVersion::MedicareV24, 2024);
    let result = engine
        .score(&medicare_request(Sex::Female, 67, "0", "NE"))
        .unwrap();

    assert_eq!(result.risk_model_population, "NE_NMCAID_NORIGDIS");
    assert_eq!(result.category_list, vec!["NEF67"]);
    assert_close(result.score, 0.4517);
}

#[test]
fn test_v24_date_of_birth_measured_on_february_first() {
    let engine = engine(medicare_v24_tables(2024), ModelVersion::MedicareV24, 2024);
    let mut request = medicare_request(Sex::Male, 0, "0", "CNA");
    request.age = None;

    request.date_of_birth = NaiveDate::from_ymd_opt(1957, 2, 2);
    assert_eq!(engine.score(&request).unwrap().risk_model_age, 66);

    request.date_of_birth = NaiveDate::from_ymd_opt(1957, 2, 1);
    assert_eq!(engine.score(&request).unwrap().risk_model_age, 67);
}

#[test]
fn test_v24_missing_weight_is_configuration_error() {
    let engine = engine(medicare_v24_tables(2024), ModelVersion::MedicareV24, 2024);
    let err = engine
        .score(&medicare_request(Sex::Male, 67, "0", "CFA"))
        .unwrap_err();

    assert_eq!(
        err,
        ScoringError::Configuration(ConfigurationError::MissingWeight {
            category: "M65_69".to_string(),
            population: "CFA".to_string(),
        })
    );
}

#[test]
fn test_v24_invalid_input() {
    let engine = engine(medicare_v24_tables(2024), ModelVersion::MedicareV24, 2024);

    let mut request = medicare_request(Sex::Male, 67, "0", "CNA");
    request.age = None;
    assert_eq!(
        engine.score(&request).unwrap_err(),
        ScoringError::Input(InputError::MissingAge)
    );

    let commercial = commercial_request(Sex::Male, 67);
    assert!(matches!(
        engine.score(&commercial),
        Err(ScoringError::Input(InputError::AttributesMismatch { .. }))
    ));
}

#[test]
fn test_scoring_is_deterministic() {
    let engine = engine(medicare_v24_tables(2024), ModelVersion::MedicareV24, 2024);
    let request = medicare_request(Sex::Female, 86, "0", "CNA").diagnoses(["I509", "E1169", "E119"]);

    let first = engine.score(&request).unwrap();
    let second = engine.score(&request).unwrap();
    assert_eq!(first, second);

    let reordered = engine
        .score(&medicare_request(Sex::Female, 86, "0", "CNA").diagnoses(["E119", "E1169", "I509"]))
        .unwrap();
    let mut a = first.category_list.clone();
    let mut b = reordered.category_list.clone();
    a.sort();
    b.sort();
    assert_eq!(a, b);
    assert_eq!(first.score, reordered.score);
}

#[test]
fn test_engine_shared_across_threads() {
    let engine = engine(medicare_v24_tables(2024), ModelVersion::MedicareV24, 2024);
    let request = medicare_request(Sex::Male, 67, "1", "CNA").diagnoses(["E1169", "I509"]);
    let expected = engine.score(&request).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| engine.score(&request).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

// =============================================================================
// Medicare V28
// =============================================================================

#[test]
fn test_v28_lone_hcc223_is_removed() {
    let engine = engine(medicare_v28_tables(2024), ModelVersion::MedicareV28, 2024);
    let result = engine
        .score(&medicare_request(Sex::Male, 72, "0", "CNA").diagnoses(["I5022"]))
        .unwrap();

    assert_eq!(result.category_list, vec!["M70_74"]);
    assert_close(result.disease_raw_score, 0.0);
}

#[test]
fn test_v28_hcc223_kept_with_other_heart_failure() {
    let engine = engine(medicare_v28_tables(2024), ModelVersion::MedicareV28, 2024);
    let request = medicare_request(Sex::Male, 72, "0", "CNA")
        .diagnoses(["I5022", "I509"])
        .verbose(true);

    let result = engine.score(&request).unwrap();

    assert_eq!(result.category_list, vec!["M70_74", "HCC223", "D1"]);
    assert_eq!(
        result.detail("HCC223").unwrap().dropped_categories,
        Some(vec!["HCC226".to_string()])
    );
}

#[test]
fn test_v28_removed_hcc223_does_not_suppress_cardiomyopathy() {
    let engine = engine(medicare_v28_tables(2024), ModelVersion::MedicareV28, 2024);
    let request = medicare_request(Sex::Male, 72, "0", "CNA")
        .diagnoses(["I5022", "I420"])
        .verbose(true);

    let result = engine.score(&request).unwrap();

    assert_eq!(result.category_list, vec!["M70_74", "HCC227", "D1"]);
    assert!(result.detail("HCC227").unwrap().dropped_categories.is_none());
    assert_close(result.raw_score, 0.65);
    assert_close(result.disease_raw_score, 0.25);
}

// =============================================================================
// Commercial V07
// =============================================================================

#[test]
fn test_v07_adult_group_and_drug_interaction() {
    let engine = engine(commercial_v07_tables(2024), ModelVersion::CommercialV07, 2024);
    let request = commercial_request(Sex::Female, 37)
        .diagnoses(["E1169", "E1065"])
        .ndcs(["00002143380"])
        .verbose(true);

    let result = engine.score(&request).unwrap();

    assert_eq!(result.risk_model_population, "Adult_silver");
    assert_eq!(
        result.category_list,
        vec!["FAGE_LAST_35_39", "RXC_06", "G01", "RXC_06_x_HCC018_019_020_021"]
    );

    let group = result.detail("G01").unwrap();
    let members = Some(vec!["HHS_HCC019".to_string(), "HHS_HCC020".to_string()]);
    assert_eq!(group.triggering_codes, members);
    assert_eq!(group.dropped_categories, members);

    let interaction = result.detail("RXC_06_x_HCC018_019_020_021").unwrap();
    let triggers = interaction.triggering_codes.as_ref().unwrap();
    assert!(triggers.contains(&"RXC_06".to_string()));

    assert_close(result.raw_score, 1.1);
    // Only the drug interaction counts as disease; RXC_06 and G01 do not.
    assert_close(result.disease_raw_score, 0.15);
    assert_close(result.demographic_raw_score, 0.2);
    assert_close(result.score, 1.1);
}

#[test]
fn test_v07_group_only_member_has_no_disease_subtotal() {
    let engine = engine(commercial_v07_tables(2024), ModelVersion::CommercialV07, 2024);
    let result = engine
        .score(&commercial_request(Sex::Female, 37).diagnoses(["E1169", "E1065"]))
        .unwrap();

    assert_eq!(result.category_list, vec!["FAGE_LAST_35_39", "G01"]);
    assert_close(result.raw_score, 0.55);
    assert_close(result.demographic_raw_score, 0.2);
    assert_close(result.disease_raw_score, 0.0);
    assert_close(result.disease_score, 0.0);
}

#[test]
fn test_v07_cost_sharing_reduction() {
    let engine = engine(commercial_v07_tables(2024), ModelVersion::CommercialV07, 2024);
    let mut request = commercial_request(Sex::Female, 37)
        .diagnoses(["E1169", "E1065"])
        .ndcs(["00002143380"]);
    request.attributes =
        MemberAttributes::Commercial(CommercialAttributes::new(MetalLevel::Silver).with_csr(2));

    let result = engine.score(&request).unwrap();

    assert_close(result.raw_score, 1.1);
    assert_close(result.score, 1.177);
    assert_close(result.demographic_score, 0.214);
    assert_close(result.disease_raw_score, 0.15);
    assert_close(result.disease_score, round_to(0.15 * 1.07, 3));
    assert_eq!(result.factor(FactorKind::CostSharingReduction), Some(1.07));
    assert_eq!(result.factor(FactorKind::Normalization), None);
    assert_eq!(result.enrollment_months, Some(12));
}

#[test]
fn test_v07_short_enrollment() {
    let engine = engine(commercial_v07_tables(2024), ModelVersion::CommercialV07, 2024);
    let mut request = commercial_request(Sex::Female, 37).diagnoses(["N186"]);
    request.attributes = MemberAttributes::Commercial(
        CommercialAttributes::new(MetalLevel::Silver).with_enrollment_days(45),
    );

    let result = engine.score(&request).unwrap();

    assert_eq!(
        result.category_list,
        vec!["FAGE_LAST_35_39", "HHS_HCC130", "HCC_ED2"]
    );
    assert_close(result.raw_score, 1.55);
    assert_eq!(result.enrollment_months, Some(2));
    assert_eq!(result.factor(FactorKind::CostSharingReduction), Some(1.0));
}

#[test]
fn test_v07_child_drops_drug_categories() {
    let engine = engine(commercial_v07_tables(2024), ModelVersion::CommercialV07, 2024);
    let request = commercial_request(Sex::Male, 12)
        .diagnoses(["E1169"])
        .ndcs(["00002143380"]);

    let result = engine.score(&request).unwrap();

    assert_eq!(result.risk_model_population, "Child_silver");
    assert_eq!(result.category_list, vec!["MAGE_LAST_10_14", "G01"]);
    assert_close(result.raw_score, 0.7);
}

#[test]
fn test_v07_infant_maturity_and_severity() {
    let engine = engine(commercial_v07_tables(2024), ModelVersion::CommercialV07, 2024);

    let premature = engine
        .score(&commercial_request(Sex::Male, 0).diagnoses(["P0701", "N186"]))
        .unwrap();
    assert_eq!(premature.risk_model_population, "Infant_silver");
    assert_eq!(
        premature.category_list,
        vec!["Age0_Male", "Extremely_Immature_x_Severity5"]
    );
    assert_close(premature.raw_score, 190.2);

    let term = engine
        .score(&commercial_request(Sex::Male, 0).diagnoses(["N186"]))
        .unwrap();
    assert_eq!(term.category_list, vec!["Age1_x_Severity5", "Age1_Male"]);
    assert_close(term.raw_score, 12.1);
}
