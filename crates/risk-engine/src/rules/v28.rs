//! CMS-HCC V28.

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
use crate::hierarchy::PatchRule;
use crate::interactions::{Condition, CountExclusions, DerivedCategory, InteractionEngine, InteractionRule};
use crate::mapper::{AgeSexEdit, EditCondition, EditOutcome};

const BREAST_CANCER_CODES: &[&str] = &[
    "C50011", "C50012", "C50019", "C50021", "C50022", "C50029", "C50111", "C50112", "C50119",
    "C50121", "C50122", "C50129", "C50211", "C50212", "C50219", "C50221", "C50222", "C50229",
    "C50311", "C50312", "C50319", "C50321", "C50322", "C50329", "C50411", "C50412", "C50419",
    "C50421", "C50422", "C50429", "C50511", "C50512", "C50519", "C50521", "C50522", "C50529",
    "C50611", "C50612", "C50619", "C50621", "C50622", "C50629", "C50811", "C50812", "C50819",
    "C50821", "C50822", "C50829", "C50911", "C50912", "C50919", "C50921", "C50922", "C50929",
];

const PERINATAL_CODES: &[&str] = &[
    "P040", "P041", "P0411", "P0412", "P0413", "P0414", "P0415", "P0416", "P0417", "P0418",
    "P0419", "P041A", "P042", "P043", "P0440", "P0441", "P0442", "P0449", "P045", "P046", "P048",
    "P0481", "P0489", "P049", "P270", "P271", "P278", "P279", "P930", "P938", "P961", "P962",
];

const EDITS: &[AgeSexEdit] = &[
    AgeSexEdit {
        condition: EditCondition::Sex(Sex::Female),
        codes: &["D66", "D67"],
        outcome: EditOutcome::Remap(&["HCC112"]),
    },
    AgeSexEdit {
        condition: EditCondition::AgeBelow(18),
        codes: CHRONIC_LUNG_CODES,
        outcome: EditOutcome::Drop,
    },
    AgeSexEdit {
        condition: EditCondition::AgeBelow(50),
        codes: BREAST_CANCER_CODES,
        outcome: EditOutcome::Remap(&["HCC22"]),
    },
    AgeSexEdit {
        condition: EditCondition::AgeAtLeast(2),
        codes: PERINATAL_CODES,
        outcome: EditOutcome::Drop,
    },
];

const DEMOGRAPHIC_INTERACTIONS: &[DemographicInteraction] = &[
    DemographicInteraction {
        flag: BeneficiaryFlag::OriginallyDisabled,
        name: InteractionName::BySex("OriginallyDisabled"),
    },
    DemographicInteraction {
        flag: BeneficiaryFlag::Medicaid,
        name: InteractionName::Fixed("LTIMCAID"),
    },
];

const CLASSIFIER: DemographicClassifier = DemographicClassifier {
    bands: medicare::BANDS,
    new_enrollee_bands: Some(medicare::NEW_ENROLLEE_BANDS),
    naming: BandNaming::SexBand,
    interactions: DEMOGRAPHIC_INTERACTIONS,
};

const HEART_FAILURE: &[&str] = &["HCC221", "HCC222", "HCC223", "HCC224", "HCC225", "HCC226"];

const PATCHES: &[PatchRule] = &[PatchRule {
    target: "HCC223",
    requires_any_of: &["HCC221", "HCC222", "HCC224", "HCC225", "HCC226"],
}];

const CANCER: Condition = Condition::AnyOf(&["HCC17", "HCC18", "HCC19", "HCC20", "HCC21", "HCC22", "HCC23"]);
const DIABETES: Condition = Condition::AnyOf(&["HCC35", "HCC36", "HCC37", "HCC38"]);
const CARD_RESP_FAIL: Condition = Condition::AnyOf(&["HCC211", "HCC212", "HCC213"]);
const HF: Condition = Condition::AnyOf(HEART_FAILURE);
const CHR_LUNG: Condition = Condition::AnyOf(&["HCC276", "HCC277", "HCC278", "HCC279", "HCC280"]);
const KIDNEY: Condition = Condition::AnyOf(&["HCC326", "HCC327", "HCC328", "HCC329"]);
const SUBSTANCE_USE: Condition = Condition::AnyOf(&["HCC135", "HCC136", "HCC137", "HCC138", "HCC139"]);
const PSYCH: Condition = Condition::AnyOf(&["HCC151", "HCC152", "HCC153", "HCC154", "HCC155"]);
const NEURO: Condition = Condition::AnyOf(&[
    "HCC180", "HCC181", "HCC182", "HCC190", "HCC191", "HCC192", "HCC195", "HCC196", "HCC198", "HCC199",
]);
const ULCER: Condition = Condition::AnyOf(&["HCC379", "HCC380", "HCC381", "HCC382"]);

const RULES: &[InteractionRule] = &[
    InteractionRule::new("DIABETES_HF_V28", &[DIABETES, HF]),
    InteractionRule::new("HF_CHR_LUNG_V28", &[HF, CHR_LUNG]),
    InteractionRule::new("HF_KIDNEY_V28", &[HF, KIDNEY]),
    InteractionRule::new("CHR_LUNG_CARD_RESP_FAIL_V28", &[CHR_LUNG, CARD_RESP_FAIL]),
    InteractionRule::new("HF_HCC238_V28", &[HF, Condition::Has("HCC238")]),
    InteractionRule::new("gSubUseDisorder_gPsych_V28", &[SUBSTANCE_USE, PSYCH]),
    InteractionRule::new("DISABLED_CANCER_V28", &[Condition::Disabled, CANCER]),
    InteractionRule::new("DISABLED_NEURO_V28", &[Condition::Disabled, NEURO]),
    InteractionRule::new("DISABLED_HF_V28", &[Condition::Disabled, HF]),
    InteractionRule::new("DISABLED_CHR_LUNG_V28", &[Condition::Disabled, CHR_LUNG]),
    InteractionRule::new("DISABLED_ULCER_V28", &[Condition::Disabled, ULCER]),
];

const INTERACTIONS: InteractionEngine = InteractionEngine {
    rules: RULES,
    counts: medicare::PAYMENT_COUNT,
    exclusions: CountExclusions::NONE,
};

/// CMS-HCC V28 rules for one payment year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedicareV28Rules {
    year: u16,
}

impl MedicareV28Rules {
    /// Rules for a payment year.
    pub fn new(year: u16) -> Self {
        Self { year }
    }
}

impl ModelRules for MedicareV28Rules {
    fn key(&self) -> ModelKey {
        ModelKey::new(ModelVersion::MedicareV28, self.year)
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

    fn patches(&self) -> &'static [PatchRule] {
        PATCHES
    }

    fn group_segment(&self, _beneficiary: &Beneficiary) -> &'static str {
        well_known::ALL_SEGMENTS
    }

    fn resolve_interactions(&self, categories: &CategorySet, beneficiary: &Beneficiary) -> Vec<DerivedCategory> {
        INTERACTIONS.derive(categories, beneficiary)
    }

    fn adjustment(&self, _beneficiary: &Beneficiary) -> Adjustment {
        medicare::adjustment(ModelVersion::MedicareV28, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beneficiary::{MedicareProfile, Profile};
    use risk_types::{Category, CategoryDefinition, CategoryKind, EntitlementReason, MedicarePopulation};

    fn beneficiary(age: u32, orec: EntitlementReason, medicaid: bool) -> Beneficiary {
        let disabled = age < 65 && orec != EntitlementReason::OldAge;
        Beneficiary {
            sex: Sex::Female,
            age,
            profile: Profile::Medicare(MedicareProfile {
                orec,
                medicaid,
                population: MedicarePopulation::CommunityFullDualAged,
                disabled,
                originally_disabled: orec.is_originally_disabled() && !disabled,
                risk_model_population: "CFA".to_string(),
            }),
        }
    }

    fn diseases(names: &[&str]) -> CategorySet {
        names
            .iter()
            .map(|name| Category::new(*name, &CategoryDefinition::new(CategoryKind::Disease, *name), 0.1))
            .collect()
    }

    #[test]
    fn test_medicaid_interaction() {
        let rules = MedicareV28Rules::new(2025);
        let member = beneficiary(72, EntitlementReason::Disability, true);
        assert_eq!(
            rules.classify_demographics(&member).unwrap(),
            vec!["F70_74", "OriginallyDisabled_Female", "LTIMCAID"]
        );
    }

    #[test]
    fn test_edits() {
        let breast = EDITS.iter().find(|edit| edit.matches("C50911", Sex::Female, 45));
        assert_eq!(breast.map(|edit| edit.outcome), Some(EditOutcome::Remap(&["HCC22"])));
        assert!(EDITS.iter().all(|edit| !edit.matches("C50911", Sex::Female, 50)));

        let copd = EDITS.iter().find(|edit| edit.matches("J449", Sex::Male, 10));
        assert_eq!(copd.map(|edit| edit.outcome), Some(EditOutcome::Drop));

        assert!(EDITS[3].matches("P270", Sex::Male, 2));
        assert!(!EDITS[3].matches("P270", Sex::Male, 1));
    }

    #[test]
    fn test_interactions() {
        let rules = MedicareV28Rules::new(2025);
        let member = beneficiary(55, EntitlementReason::Disability, false);
        let names: Vec<String> = rules
            .resolve_interactions(&diseases(&["HCC37", "HCC224", "HCC280", "HCC382"]), &member)
            .into_iter()
            .map(|category| category.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "DIABETES_HF_V28",
                "HF_CHR_LUNG_V28",
                "DISABLED_HF_V28",
                "DISABLED_CHR_LUNG_V28",
                "DISABLED_ULCER_V28",
                "D4"
            ]
        );
    }

    #[test]
    fn test_patch_rule() {
        let patches = MedicareV28Rules::new(2024).patches();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].target, "HCC223");
        assert!(!patches[0].requires_any_of.contains(&"HCC223"));
    }
}
