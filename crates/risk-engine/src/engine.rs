//! The scoring pipeline.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use risk_loader::ReferenceTables;
use risk_types::{Category, CodeType, ModelKey, ScoringRequest, ScoringResult};

use crate::aggregate::RawScores;
use crate::beneficiary::Beneficiary;
use crate::category_set::CategorySet;
use crate::error::{ConfigurationError, EngineResult};
use crate::hierarchy::{apply_groups, HierarchyResolver};
use crate::mapper::CodeCategoryMapper;
use crate::rules::{rules_for, ModelRules};

/// Scores members against one model version and year.
///
/// The engine holds shared, read-only reference tables; every call to
/// [`score`](Self::score) works on freshly allocated state, so one engine can
/// be shared across threads.
pub struct ScoringEngine {
    tables: Arc<ReferenceTables>,
    rules: Box<dyn ModelRules>,
}

impl ScoringEngine {
    /// Creates an engine with the built-in rules for `key`.
    pub fn new(tables: Arc<ReferenceTables>, key: ModelKey) -> Self {
        Self::with_rules(tables, rules_for(key))
    }

    /// Creates an engine with explicit rules.
    pub fn with_rules(tables: Arc<ReferenceTables>, rules: Box<dyn ModelRules>) -> Self {
        if let Some(loaded) = tables.key() {
            if loaded != rules.key() {
                tracing::warn!(tables = %loaded, rules = %rules.key(), "reference tables and rules differ");
            }
        }
        Self { tables, rules }
    }

    /// Model version and year scored.
    pub fn key(&self) -> ModelKey {
        self.rules.key()
    }

    /// Reference tables in use.
    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    /// Scores one member.
    pub fn score(&self, request: &ScoringRequest) -> EngineResult<ScoringResult> {
        let key = self.rules.key();
        let beneficiary = Beneficiary::from_request(request, key.version, self.rules.age_reference_date())?;
        let population = beneficiary.risk_model_population();

        let demographic = self.rules.classify_demographics(&beneficiary)?;
        let candidates = self.candidate_categories(request, &beneficiary);
        let disease_names: Vec<String> = candidates.keys().cloned().collect();

        let categories = match self
            .rules
            .substitute_categories(&beneficiary, &demographic, &disease_names)
        {
            Some(names) => names
                .iter()
                .map(|name| self.make_category(name, population))
                .collect::<EngineResult<CategorySet>>()?,
            None => self.resolve(&beneficiary, &demographic, candidates)?,
        };

        let raw = RawScores::from_categories(&categories);
        let adjustment = self.rules.adjustment(&beneficiary);

        tracing::debug!(
            model = %key,
            categories = categories.len(),
            raw_score = raw.total,
            "member scored"
        );

        Ok(ScoringResult {
            model: key,
            raw_score: raw.total,
            disease_raw_score: raw.disease,
            demographic_raw_score: raw.demographic,
            score: adjustment.apply(raw.total),
            disease_score: adjustment.apply(raw.disease),
            demographic_score: adjustment.apply(raw.demographic),
            risk_model_age: beneficiary.age,
            risk_model_population: population.to_string(),
            adjustment_factors: adjustment.factors(),
            enrollment_months: beneficiary.commercial().map(|c| c.enrollment_months),
            category_list: categories.names().map(str::to_string).collect(),
            category_details: categories
                .iter()
                .map(|category| (category.name.clone(), category.detail(request.verbose)))
                .collect(),
            request: request.clone(),
        })
    }

    /// Disease categories keyed by name in first-seen order, with their triggering codes.
    fn candidate_categories(
        &self,
        request: &ScoringRequest,
        beneficiary: &Beneficiary,
    ) -> IndexMap<String, Vec<String>> {
        let mapper = CodeCategoryMapper::new(&self.tables, self.rules.edits());
        let inputs = [
            (CodeType::Diagnosis, &request.diagnosis_codes),
            (CodeType::Ndc, &request.ndc_codes),
            (CodeType::Procedure, &request.procedure_codes),
        ];

        let mut candidates: IndexMap<String, Vec<String>> = IndexMap::new();
        for (code_type, codes) in inputs {
            for mapped in mapper.map_codes(code_type, codes.as_slice(), beneficiary) {
                for category in mapped.categories {
                    if !self.rules.admits_category(&category, beneficiary) {
                        continue;
                    }
                    let codes = candidates.entry(category).or_default();
                    if !codes.contains(&mapped.code) {
                        codes.push(mapped.code.clone());
                    }
                }
            }
        }
        candidates
    }

    /// Builds the category set and runs hierarchies, groups and interactions.
    fn resolve(
        &self,
        beneficiary: &Beneficiary,
        demographic: &[String],
        candidates: IndexMap<String, Vec<String>>,
    ) -> EngineResult<CategorySet> {
        let population = beneficiary.risk_model_population();

        let mut categories = CategorySet::new();
        for name in demographic {
            categories.insert(self.make_category(name, population)?);
        }
        for (name, codes) in candidates {
            let mut category = self.make_category(&name, population)?;
            for code in codes {
                category.add_triggering_code(code);
            }
            categories.insert(category);
        }

        let resolver = HierarchyResolver::new(self.tables.hierarchy(), self.rules.patches());
        let (mut categories, mut audit) = resolver.apply_hierarchies(categories);

        if let Some(groups) = self.tables.get_groups(self.rules.group_segment(beneficiary)) {
            categories = apply_groups(categories, groups, &mut audit, |name| {
                self.make_category(name, population)
            })?;
        }

        tracing::debug!(
            suppressed = audit.suppressed.values().map(Vec::len).sum::<usize>(),
            patched = audit.patched.len(),
            grouped = audit.grouped.len(),
            "hierarchies resolved"
        );

        for derived in self.rules.resolve_interactions(&categories, beneficiary) {
            let mut category = self.make_category(&derived.name, population)?;
            for code in derived.triggering_codes.into_iter().flatten() {
                category.add_triggering_code(code);
            }
            categories.insert(category);
        }

        Ok(categories)
    }

    fn make_category(&self, name: &str, population: &str) -> EngineResult<Category> {
        let definition = self
            .tables
            .get_definition(name)
            .ok_or_else(|| ConfigurationError::MissingCategory {
                category: name.to_string(),
            })?;
        let coefficient = self.tables.get_weight(name, population).ok_or_else(|| {
            ConfigurationError::MissingWeight {
                category: name.to_string(),
                population: population.to_string(),
            }
        })?;
        Ok(Category::new(name, definition, coefficient))
    }
}

impl fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("key", &self.rules.key())
            .field("definitions", &self.tables.definition_count())
            .finish()
    }
}
