//! CMS-HCC V24.

use chrono::NaiveDate;
use risk_types::{well_known, ModelKey, ModelVersion, Sex};

use super::medicare::{self, CHRONIC_LUNG_CODES};
use super::ModelRules;
use crate::aggregate::Adjustment;
use crate::beneficiary::Beneficiary;
use crate::category_set::CategorySet;
use crate::demographics::{
    BandNaming, BeneficiaryFlag, DemographicClassifier, DemographicInteraction, InteractionName,
};
use crate::error::InputError;
use crate::interactions::{Condition, CountExclusions, DerivedCategory, InteractionEngine, InteractionRule};
use crate::mapper::{AgeSexEdit, EditCondition, EditOutcome};

const EDITS: &[AgeSexEdit] = &[
    AgeSexEdit {
        condition: EditCondition::Sex(Sex::Female),
        codes: &["D66", "D67"],
        outcome: EditOutcome::Remap(&["HCC48"]),
    },
    AgeSexEdit {
        condition: EditCondition::AgeBelow(18),
        codes: CHRONIC_LUNG_CODES,
        outcome: EditOutcome::Remap(&["HCC112"]),
    },
    AgeSexEdit {
        condition: EditCondition::AgeOutside { below: 6, above: 18 },
        codes: &["F3481"],
        outcome: EditOutcome::Drop,
    },
];

const DEMOGRAPHIC_INTERACTIONS: &[DemographicInteraction] = &[DemographicInteraction {
    flag: BeneficiaryFlag::OriginallyDisabled,
    name: InteractionName::BySex("OriginallyDisabled"),
}];

const CLASSIFIER: DemographicClassifier = DemographicClassifier {
    bands: medicare::BANDS,
    new_enrollee_bands: Some(medicare::NEW_ENROLLEE_BANDS),
    naming: BandNaming::SexBand,
    interactions: DEMOGRAPHIC_INTERACTIONS,
};

const CANCER: Condition = Condition::AnyOf(&["HCC8", "HCC9", "HCC10", "HCC11", "HCC12"]);
const DIABETES: Condition = Condition::AnyOf(&["HCC17", "HCC18", "HCC19"]);
const CARD_RESP_FAIL: Condition = Condition::AnyOf(&["HCC82", "HCC83", "HCC84"]);
const CHF: Condition = Condition::Has("HCC85");
const COPD_CF: Condition = Condition::AnyOf(&["HCC110", "HCC111", "HCC112"]);
const RENAL: Condition = Condition::AnyOf(&["HCC134", "HCC135", "HCC136", "HCC137", "HCC138"]);
const SUBSTANCE_USE: Condition = Condition::AnyOf(&["HCC54", "HCC55", "HCC56"]);
const PSYCH: Condition = Condition::AnyOf(&["HCC57", "HCC58", "HCC59", "HCC60"]);
const PRESSURE_ULCER: Condition = Condition::AnyOf(&["HCC157", "HCC158", "HCC159"]);
const SEPSIS: Condition = Condition::Has("HCC2");
const ARTIFICIAL_OPENINGS: Condition = Condition::Has("HCC188");
const PNEUMONIA: Condition = Condition::Has("HCC114");
const SCHIZOPHRENIA: Condition = Condition::Has("HCC57");
const SEIZURES: Condition = Condition::Has("HCC79");

const RULES: &[InteractionRule] = &[
    InteractionRule::new("HCC47_gCancer", &[CANCER, Condition::Has("HCC47")]),
    InteractionRule::new("DIABETES_CHF", &[DIABETES, CHF]),
    InteractionRule::new("CHF_gCopdCF", &[CHF, COPD_CF]),
    InteractionRule::new("HCC85_gRenal_V24", &[CHF, RENAL]),
    InteractionRule::new("gCopdCF_CARD_RESP_FAIL", &[COPD_CF, CARD_RESP_FAIL]),
    InteractionRule::new("HCC85_HCC96", &[CHF, Condition::Has("HCC96")]),
    InteractionRule::new("gSubstanceUseDisorder_gPsych", &[PSYCH, SUBSTANCE_USE]),
    InteractionRule::new("SEPSIS_PRESSURE_ULCER", &[SEPSIS, PRESSURE_ULCER]),
    InteractionRule::new("SEPSIS_ARTIF_OPENINGS", &[SEPSIS, ARTIFICIAL_OPENINGS]),
    InteractionRule::new("ART_OPENINGS_PRESS_ULCER", &[ARTIFICIAL_OPENINGS, PRESSURE_ULCER]),
    InteractionRule::new("gCopdCF_ASP_SPEC_B_PNEUM", &[COPD_CF, PNEUMONIA]),
    InteractionRule::new("ASP_SPEC_B_PNEUM_PRES_ULC", &[PNEUMONIA, PRESSURE_ULCER]),
    InteractionRule::new("SEPSIS_ASP_SPEC_BACT_PNEUM", &[SEPSIS, PNEUMONIA]),
    InteractionRule::new("SCHIZOPHRENIA_gCopdCF", &[SCHIZOPHRENIA, COPD_CF]),
    InteractionRule::new("SCHIZOPHRENIA_CHF", &[SCHIZOPHRENIA, CHF]),
    InteractionRule::new("SCHIZOPHRENIA_SEIZURES", &[SCHIZOPHRENIA, SEIZURES]),
    InteractionRule::new("DISABLED_HCC85", &[Condition::Disabled, CHF]),
    InteractionRule::new("DISABLED_PRESSURE_ULCER", &[Condition::Disabled, PRESSURE_ULCER]),
    InteractionRule::new("DISABLED_HCC161", &[Condition::Disabled, Condition::Has("HCC161")]),
    InteractionRule::new("DISABLED_HCC39", &[Condition::Disabled, Condition::Has("HCC39")]),
    InteractionRule::new("DISABLED_HCC77", &[Condition::Disabled, Condition::Has("HCC77")]),
    InteractionRule::new("DISABLED_HCC6", &[Condition::Disabled, Condition::Has("HCC6")]),
];

const INTERACTIONS: InteractionEngine = InteractionEngine {
    rules: RULES,
    counts: medicare::PAYMENT_COUNT,
    exclusions: CountExclusions::NONE,
};

/// CMS-HCC V24 rules for one payment year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedicareV24Rules {
    year: u16,
}

impl MedicareV24Rules {
    /// Rules for a payment year.
    pub fn new(year: u16) -> Self {
        Self { year }
    }
}

impl ModelRules for MedicareV24Rules {
    fn key(&self) -> ModelKey {
        ModelKey::new(ModelVersion::MedicareV24, self.year)
    }

    fn age_reference_date(&self) -> Option<NaiveDate> {
        medicare::reference_date(self.year)
    }

    fn edits(&self) -> &'static [AgeSexEdit] {
        EDITS
    }

    fn classify_demographics(&self, beneficiary: &Beneficiary) -> Result<Vec<String>, InputError> {
        CLASSIFIER.classify(beneficiary)
    }

    fn group_segment(&self, _beneficiary: &Beneficiary) -> &'static str {
        well_known::ALL_SEGMENTS
    }

    fn resolve_interactions(&self, categories: &CategorySet, beneficiary: &Beneficiary) -> Vec<DerivedCategory> {
        INTERACTIONS.derive(categories, beneficiary)
    }

    fn adjustment(&self, _beneficiary: &Beneficiary) -> Adjustment {
        medicare::adjustment(ModelVersion::MedicareV24, self.year)
    }
}
