//! Common test utilities for scoring integration tests.
//!
//! Each builder returns a small reference table set holding only the rows
//! the scenarios need, so expected scores can be worked out by hand.

#![allow(dead_code)]

use std::sync::Arc;

use risk_engine::ScoringEngine;
use risk_loader::ReferenceTables;
use risk_types::{
    CategoryDefinition, CategoryKind, CodeType, CommercialAttributes, MedicareAttributes,
    MemberAttributes, MetalLevel, ModelKey, ModelVersion, ScoringRequest, Sex,
};

// =============================================================================
// Table Builders
// =============================================================================

fn define(tables: &mut ReferenceTables, kind: CategoryKind, names: &[&str]) {
    for name in names {
        tables.insert_definition(*name, CategoryDefinition::new(kind, format!("{name} description")));
    }
}

fn weigh(tables: &mut ReferenceTables, population: &str, weights: &[(&str, f64)]) {
    for (category, weight) in weights {
        tables.insert_weight(*category, population, *weight);
    }
}

/// V24 tables with `CNA` and one new-enrollee column.
pub fn medicare_v24_tables(year: u16) -> ReferenceTables {
    let mut tables = ReferenceTables::with_key(ModelKey::new(ModelVersion::MedicareV24, year));

    define(
        &mut tables,
        CategoryKind::Demographic,
        &["M65_69", "F65_69", "F85_89", "NEF67"],
    );
    define(
        &mut tables,
        CategoryKind::DemographicInteraction,
        &["OriginallyDisabled_Male", "OriginallyDisabled_Female"],
    );
    define(
        &mut tables,
        CategoryKind::Disease,
        &["HCC17", "HCC18", "HCC19", "HCC46", "HCC48", "HCC85"],
    );
    define(&mut tables, CategoryKind::DiseaseInteraction, &["DIABETES_CHF"]);
    define(&mut tables, CategoryKind::Count, &["D1", "D2", "D3"]);

    weigh(
        &mut tables,
        "CNA",
        &[
            ("M65_69", 0.3),
            ("F65_69", 0.28),
            ("F85_89", 0.5),
            ("OriginallyDisabled_Male", 0.25),
            ("OriginallyDisabled_Female", 0.2),
            ("HCC17", 0.302),
            ("HCC18", 0.302),
            ("HCC19", 0.105),
            ("HCC46", 0.2),
            ("HCC48", 0.192),
            ("HCC85", 0.331),
            ("DIABETES_CHF", 0.121),
            ("D1", 0.0),
            ("D2", 0.0),
            ("D3", 0.0),
        ],
    );
    weigh(&mut tables, "NE_NMCAID_NORIGDIS", &[("NEF67", 0.55)]);

    tables.insert_code_mapping(CodeType::Diagnosis, "E1110", "HCC17");
    tables.insert_code_mapping(CodeType::Diagnosis, "E1169", "HCC18");
    tables.insert_code_mapping(CodeType::Diagnosis, "E119", "HCC19");
    tables.insert_code_mapping(CodeType::Diagnosis, "D66", "HCC46");
    tables.insert_code_mapping(CodeType::Diagnosis, "I509", "HCC85");
    tables.insert_code_mapping(CodeType::Diagnosis, "Z0000", "NA");

    tables.insert_hierarchy("HCC17", ["HCC18", "HCC19"]);
    tables.insert_hierarchy("HCC18", ["HCC19"]);

    tables
}

/// V28 tables covering the heart failure and cardiomyopathy hierarchy.
pub fn medicare_v28_tables(year: u16) -> ReferenceTables {
    let mut tables = ReferenceTables::with_key(ModelKey::new(ModelVersion::MedicareV28, year));

    define(&mut tables, CategoryKind::Demographic, &["M70_74"]);
    define(
        &mut tables,
        CategoryKind::Disease,
        &["HCC223", "HCC224", "HCC226", "HCC227"],
    );
    define(&mut tables, CategoryKind::Count, &["D1", "D2"]);

    weigh(
        &mut tables,
        "CNA",
        &[
            ("M70_74", 0.4),
            ("HCC223", 0.4),
            ("HCC224", 0.3),
            ("HCC226", 0.2),
            ("HCC227", 0.25),
            ("D1", 0.0),
            ("D2", 0.0),
        ],
    );

    tables.insert_code_mapping(CodeType::Diagnosis, "I5022", "HCC223");
    tables.insert_code_mapping(CodeType::Diagnosis, "I5032", "HCC224");
    tables.insert_code_mapping(CodeType::Diagnosis, "I509", "HCC226");
    tables.insert_code_mapping(CodeType::Diagnosis, "I420", "HCC227");

    tables.insert_hierarchy("HCC223", ["HCC224", "HCC226", "HCC227"]);
    tables.insert_hierarchy("HCC224", ["HCC226"]);

    tables
}

/// V07 tables with silver columns for all three age segments.
pub fn commercial_v07_tables(year: u16) -> ReferenceTables {
    let mut tables = ReferenceTables::with_key(ModelKey::new(ModelVersion::CommercialV07, year));

    define(
        &mut tables,
        CategoryKind::Demographic,
        &["FAGE_LAST_35_39", "MAGE_LAST_10_14", "Age0_Male", "Age1_Male"],
    );
    define(
        &mut tables,
        CategoryKind::Disease,
        &["HHS_HCC019", "HHS_HCC020", "HHS_HCC130", "HHS_HCC242"],
    );
    define(&mut tables, CategoryKind::Rx, &["RXC_06"]);
    define(&mut tables, CategoryKind::DiseaseInteraction, &["RXC_06_x_HCC018_019_020_021"]);
    define(&mut tables, CategoryKind::Group, &["G01"]);
    define(&mut tables, CategoryKind::DiseaseInteraction, &["HCC_ED2"]);
    define(
        &mut tables,
        CategoryKind::Count,
        &["SEVERE_HCC_COUNT1", "SEVERE_HCC_COUNT2"],
    );
    define(
        &mut tables,
        CategoryKind::Disease,
        &["Extremely_Immature_x_Severity5", "Age1_x_Severity1", "Age1_x_Severity5"],
    );

    weigh(
        &mut tables,
        "Adult_silver",
        &[
            ("FAGE_LAST_35_39", 0.2),
            ("HHS_HCC019", 0.3),
            ("HHS_HCC020", 0.3),
            ("HHS_HCC130", 1.1),
            ("RXC_06", 0.4),
            ("RXC_06_x_HCC018_019_020_021", 0.15),
            ("G01", 0.35),
            ("HCC_ED2", 0.25),
            ("SEVERE_HCC_COUNT1", 0.05),
        ],
    );
    weigh(
        &mut tables,
        "Child_silver",
        &[
            ("MAGE_LAST_10_14", 0.1),
            ("HHS_HCC019", 0.5),
            ("HHS_HCC020", 0.5),
            ("G01", 0.6),
        ],
    );
    weigh(
        &mut tables,
        "Infant_silver",
        &[
            ("Age0_Male", 0.2),
            ("Age1_Male", 0.1),
            ("Extremely_Immature_x_Severity5", 190.0),
            ("Age1_x_Severity1", 0.3),
            ("Age1_x_Severity5", 12.0),
        ],
    );

    tables.insert_code_mapping(CodeType::Diagnosis, "E1169", "HHS_HCC019");
    tables.insert_code_mapping(CodeType::Diagnosis, "E1065", "HHS_HCC020");
    tables.insert_code_mapping(CodeType::Diagnosis, "N186", "HHS_HCC130");
    tables.insert_code_mapping(CodeType::Diagnosis, "P0701", "HHS_HCC242");
    tables.insert_code_mapping(CodeType::Ndc, "00002143380", "RXC_06");

    for segment in ["Adult", "Child"] {
        for member in ["HHS_HCC019", "HHS_HCC020", "HHS_HCC021"] {
            tables.insert_group_member(segment, member, "G01");
        }
    }

    tables
}

// =============================================================================
// Engines and Requests
// =============================================================================

/// Builds an engine over fixture tables.
pub fn engine(tables: ReferenceTables, version: ModelVersion, year: u16) -> ScoringEngine {
    ScoringEngine::new(Arc::new(tables), ModelKey::new(version, year))
}

/// Medicare request with no codes.
pub fn medicare_request(sex: Sex, age: u32, orec: &str, population: &str) -> ScoringRequest {
    ScoringRequest::with_age(
        sex,
        age,
        MemberAttributes::Medicare(MedicareAttributes::new(orec, false, population)),
    )
}

/// Commercial silver-plan request for a full year with no codes.
pub fn commercial_request(sex: Sex, age: u32) -> ScoringRequest {
    ScoringRequest::with_age(
        sex,
        age,
        MemberAttributes::Commercial(CommercialAttributes::new(MetalLevel::Silver)),
    )
}

/// Asserts two scores agree to floating point noise.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
