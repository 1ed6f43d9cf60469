//! Code-to-category mapping with age/sex edits.
//!
//! Each code maps to the categories listed in the reference tables. Diagnosis
//! codes then pass through the model's ordered edit chain: the first edit
//! whose code list and age/sex condition match replaces the mapped categories
//! outright, possibly with nothing at all.

use risk_loader::parser::parse;
use risk_loader::ReferenceTables;
use risk_types::{well_known, CodeType, Sex};

use crate::beneficiary::Beneficiary;

/// Age/sex predicate of an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCondition {
    /// Any member.
    Always,
    /// Member has this sex.
    Sex(Sex),
    /// Age strictly below the bound.
    AgeBelow(u32),
    /// Age at or above the bound.
    AgeAtLeast(u32),
    /// Age strictly below `below` or strictly above `above`.
    AgeOutside {
        /// Lower bound (exclusive).
        below: u32,
        /// Upper bound (exclusive).
        above: u32,
    },
}

impl EditCondition {
    fn holds(self, sex: Sex, age: u32) -> bool {
        match self {
            Self::Always => true,
            Self::Sex(expected) => sex == expected,
            Self::AgeBelow(bound) => age < bound,
            Self::AgeAtLeast(bound) => age >= bound,
            Self::AgeOutside { below, above } => age < below || age > above,
        }
    }
}

/// What a matching edit does to a code's categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Replace the mapped categories with these.
    Remap(&'static [&'static str]),
    /// The code maps to no category.
    Drop,
}

/// One literal age/sex edit from a model's published edit table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeSexEdit {
    /// Condition on the member.
    pub condition: EditCondition,
    /// Diagnosis codes the edit applies to.
    pub codes: &'static [&'static str],
    /// Replacement.
    pub outcome: EditOutcome,
}

impl AgeSexEdit {
    /// Returns true if the edit applies to this code for this member.
    pub fn matches(&self, code: &str, sex: Sex, age: u32) -> bool {
        self.condition.holds(sex, age) && self.codes.contains(&code)
    }

    fn categories(&self) -> Vec<String> {
        match self.outcome {
            EditOutcome::Remap(categories) => categories.iter().map(|c| c.to_string()).collect(),
            EditOutcome::Drop => Vec::new(),
        }
    }
}

/// A code and the categories it contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedCode {
    /// Normalised code.
    pub code: String,
    /// Code type.
    pub code_type: CodeType,
    /// Categories after edits, never containing the no-category sentinel.
    pub categories: Vec<String>,
}

/// Maps billing codes to candidate categories.
pub struct CodeCategoryMapper<'a> {
    tables: &'a ReferenceTables,
    edits: &'a [AgeSexEdit],
}

impl<'a> CodeCategoryMapper<'a> {
    /// Creates a mapper over a model's tables and edit chain.
    pub fn new(tables: &'a ReferenceTables, edits: &'a [AgeSexEdit]) -> Self {
        Self { tables, edits }
    }

    /// Maps one code. Unknown codes map to nothing.
    pub fn map_code(&self, code_type: CodeType, code: &str, beneficiary: &Beneficiary) -> MappedCode {
        let code = parse::code(code);
        let raw = self.tables.get_categories(code_type, &code);

        let edited = match code_type {
            CodeType::Diagnosis => self
                .edits
                .iter()
                .find(|edit| edit.matches(&code, beneficiary.sex, beneficiary.age)),
            CodeType::Ndc | CodeType::Procedure => None,
        };

        let categories = match edited {
            Some(edit) => {
                tracing::debug!(code = %code, outcome = ?edit.outcome, "age/sex edit applied");
                edit.categories()
            }
            None => {
                if raw.is_empty() {
                    tracing::debug!(code = %code, code_type = ?code_type, "code has no category mapping");
                }
                raw.iter()
                    .filter(|category| category.as_str() != well_known::NO_CATEGORY)
                    .cloned()
                    .collect()
            }
        };

        MappedCode {
            code,
            code_type,
            categories,
        }
    }

    /// Maps a list of codes of one type, in input order.
    pub fn map_codes<S: AsRef<str>>(
        &self,
        code_type: CodeType,
        codes: &[S],
        beneficiary: &Beneficiary,
    ) -> Vec<MappedCode> {
        codes
            .iter()
            .map(|code| self.map_code(code_type, code.as_ref(), beneficiary))
            .collect()
    }
}
