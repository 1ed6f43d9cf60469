//! In-memory reference tables.
//!
//! One [`ReferenceTables`] value holds everything a model version needs for
//! one model year. Tables are built once, either from discovered files or
//! through the `insert_*` methods, and are read-only while scoring.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use indexmap::IndexMap;
use risk_types::{CategoryDefinition, CodeType, LineOfBusiness, ModelKey};

use crate::code_map::CodeMapping;
use crate::definitions::{
    parse_category_definitions, parse_group_definitions, parse_hierarchy_definitions,
};
use crate::parser::TableParser;
use crate::types::{LoadConfig, LoadError, LoadResult, LoadStats, ReferenceFiles};
use crate::weights::{parse_weights, WeightLayout, WeightRow};

type Definitions = IndexMap<String, CategoryDefinition>;
type Hierarchy = IndexMap<String, Vec<String>>;
type Groups = HashMap<String, IndexMap<String, String>>;

/// Reference tables for one model version and year.
///
/// # Example
///
/// ```
/// use risk_loader::ReferenceTables;
/// use risk_types::{CategoryDefinition, CategoryKind, CodeType};
///
/// let mut tables = ReferenceTables::new();
/// tables.insert_definition("HCC18", CategoryDefinition::new(CategoryKind::Disease, "Diabetes"));
/// tables.insert_weight("HCC18", "CNA", 0.302);
/// tables.insert_code_mapping(CodeType::Diagnosis, "E1169", "HCC18");
///
/// assert_eq!(tables.get_weight("HCC18", "CNA"), Some(0.302));
/// assert_eq!(tables.get_categories(CodeType::Diagnosis, "E1169"), ["HCC18".to_string()]);
/// ```
#[derive(Default)]
pub struct ReferenceTables {
    /// Model version and year, when loaded from files.
    key: Option<ModelKey>,
    /// Category metadata indexed by name.
    definitions: Definitions,
    /// Weights indexed by category, then population.
    weights: HashMap<String, HashMap<String, f64>>,
    /// Code-to-category maps per code type.
    code_maps: HashMap<CodeType, HashMap<String, Vec<String>>>,
    /// Suppressor -> suppressed categories, in application order.
    hierarchy: Hierarchy,
    /// Segment -> member category -> group category.
    groups: Groups,
}

impl std::fmt::Debug for ReferenceTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceTables")
            .field("key", &self.key)
            .field("definitions", &self.definitions.len())
            .field("weights", &self.weights.len())
            .field("code_maps", &self.code_maps.len())
            .field("hierarchy", &self.hierarchy.len())
            .field("groups", &self.groups.len())
            .finish()
    }
}

impl ReferenceTables {
    /// Creates a new empty set of tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates empty tables tagged with a model key.
    pub fn with_key(key: ModelKey) -> Self {
        Self {
            key: Some(key),
            ..Self::default()
        }
    }

    /// Returns the model key the tables were loaded for.
    pub fn key(&self) -> Option<ModelKey> {
        self.key
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // LOADING
    // ═══════════════════════════════════════════════════════════════════════════

    /// Loads all tables from discovered files.
    pub fn load(files: &ReferenceFiles) -> LoadResult<Self> {
        Self::load_with_config(files, &LoadConfig::default()).map(|(tables, _)| tables)
    }

    /// Loads all tables, reporting statistics.
    ///
    /// With `config.strict`, references to undefined categories fail the load;
    /// otherwise they are logged and counted.
    pub fn load_with_config(
        files: &ReferenceFiles,
        config: &LoadConfig,
    ) -> LoadResult<(Self, LoadStats)> {
        #[cfg(feature = "parallel")]
        let tables = if config.parallel {
            Self::load_parallel(files)?
        } else {
            Self::load_sequential(files)?
        };
        #[cfg(not(feature = "parallel"))]
        let tables = Self::load_sequential(files)?;

        let undefined = tables.undefined_references();
        for reference in &undefined {
            tracing::warn!("{}: {}", files.key, reference);
        }
        if config.strict && !undefined.is_empty() {
            return Err(LoadError::Inconsistent(undefined.join("; ")));
        }

        let stats = LoadStats {
            undefined_references: undefined.len(),
            ..tables.stats()
        };
        tracing::info!(
            "Loaded {} tables: {} categories, {} weights, {} code mappings, {} hierarchies",
            files.key,
            stats.definitions,
            stats.weights,
            stats.code_mappings,
            stats.hierarchies
        );

        Ok((tables, stats))
    }

    fn load_sequential(files: &ReferenceFiles) -> LoadResult<Self> {
        let definitions = read_definitions(files.category_definitions.as_deref())?;
        let weights = read_weights(files.weights.as_deref(), weight_layout(files))?;
        let hierarchy = read_hierarchy(files.hierarchy.as_deref())?;
        let groups = read_groups(files.groups.as_deref())?;
        let diagnosis = read_code_map(files.diagnosis_map.as_deref())?;
        let ndc = read_code_map(files.ndc_map.as_deref())?;
        let procedure = read_code_map(files.procedure_map.as_deref())?;

        Ok(Self::assemble(
            files.key,
            definitions,
            weights,
            hierarchy,
            groups,
            [diagnosis, ndc, procedure],
        ))
    }

    /// Loads all tables, parsing independent files concurrently.
    #[cfg(feature = "parallel")]
    pub fn load_parallel(files: &ReferenceFiles) -> LoadResult<Self> {
        let layout = weight_layout(files);

        // Parse all files in parallel using nested rayon::join
        let ((definitions, weights), ((hierarchy, groups), (diagnosis, (ndc, procedure)))) =
            rayon::join(
                || {
                    rayon::join(
                        || read_definitions(files.category_definitions.as_deref()),
                        || read_weights(files.weights.as_deref(), layout),
                    )
                },
                || {
                    rayon::join(
                        || {
                            rayon::join(
                                || read_hierarchy(files.hierarchy.as_deref()),
                                || read_groups(files.groups.as_deref()),
                            )
                        },
                        || {
                            rayon::join(
                                || read_code_map(files.diagnosis_map.as_deref()),
                                || {
                                    rayon::join(
                                        || read_code_map(files.ndc_map.as_deref()),
                                        || read_code_map(files.procedure_map.as_deref()),
                                    )
                                },
                            )
                        },
                    )
                },
            );

        Ok(Self::assemble(
            files.key,
            definitions?,
            weights?,
            hierarchy?,
            groups?,
            [diagnosis?, ndc?, procedure?],
        ))
    }

    fn assemble(
        key: ModelKey,
        definitions: Definitions,
        weights: Vec<WeightRow>,
        hierarchy: Hierarchy,
        groups: Groups,
        code_maps: [Vec<CodeMapping>; 3],
    ) -> Self {
        let mut tables = Self {
            key: Some(key),
            definitions,
            hierarchy,
            groups,
            ..Self::default()
        };

        for row in weights {
            tables.insert_weight(row.category, row.population, row.weight);
        }
        for (code_type, rows) in CodeType::ALL.into_iter().zip(code_maps) {
            for row in rows {
                tables.insert_code_mapping(code_type, row.code, row.category);
            }
        }

        tables
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // INSERTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Inserts or replaces a category definition.
    pub fn insert_definition(&mut self, name: impl Into<String>, definition: CategoryDefinition) {
        self.definitions.insert(name.into(), definition);
    }

    /// Inserts or replaces the weight of a category for a population.
    pub fn insert_weight(
        &mut self,
        category: impl Into<String>,
        population: impl Into<String>,
        weight: f64,
    ) {
        self.weights
            .entry(category.into())
            .or_default()
            .insert(population.into(), weight);
    }

    /// Adds a code-to-category mapping. Duplicate rows are ignored.
    pub fn insert_code_mapping(
        &mut self,
        code_type: CodeType,
        code: impl Into<String>,
        category: impl Into<String>,
    ) {
        let category = category.into();
        let categories = self
            .code_maps
            .entry(code_type)
            .or_default()
            .entry(code.into())
            .or_default();
        if !categories.contains(&category) {
            categories.push(category);
        }
    }

    /// Appends a hierarchy entry. Entries apply in insertion order.
    pub fn insert_hierarchy<I, S>(&mut self, suppressor: impl Into<String>, suppressed: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hierarchy.insert(
            suppressor.into(),
            suppressed.into_iter().map(Into::into).collect(),
        );
    }

    /// Adds a group membership for a segment.
    pub fn insert_group_member(
        &mut self,
        segment: impl Into<String>,
        member: impl Into<String>,
        group: impl Into<String>,
    ) {
        self.groups
            .entry(segment.into())
            .or_default()
            .insert(member.into(), group.into());
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // LOOKUP
    // ═══════════════════════════════════════════════════════════════════════════

    /// Gets a category definition.
    pub fn get_definition(&self, name: &str) -> Option<&CategoryDefinition> {
        self.definitions.get(name)
    }

    /// Gets the weight of a category for a population.
    pub fn get_weight(&self, category: &str, population: &str) -> Option<f64> {
        self.weights.get(category)?.get(population).copied()
    }

    /// Gets the categories a code maps to. Unknown codes map to nothing.
    pub fn get_categories(&self, code_type: CodeType, code: &str) -> &[String] {
        self.code_maps
            .get(&code_type)
            .and_then(|map| map.get(code))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the hierarchy table in application order.
    pub fn hierarchy(&self) -> &IndexMap<String, Vec<String>> {
        &self.hierarchy
    }

    /// Gets the group memberships for a segment.
    pub fn get_groups(&self, segment: &str) -> Option<&IndexMap<String, String>> {
        self.groups.get(segment)
    }

    /// Returns true if the category is defined.
    pub fn has_definition(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Returns every population column that has at least one weight.
    pub fn populations(&self) -> Vec<&str> {
        let mut populations: Vec<&str> = self
            .weights
            .values()
            .flat_map(|by_population| by_population.keys().map(String::as_str))
            .collect();
        populations.sort_unstable();
        populations.dedup();
        populations
    }

    /// Returns the number of category definitions.
    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    /// Returns the number of (category, population) weights.
    pub fn weight_count(&self) -> usize {
        self.weights.values().map(HashMap::len).sum()
    }

    /// Returns the number of distinct codes mapped for a code type.
    pub fn code_count(&self, code_type: CodeType) -> usize {
        self.code_maps.get(&code_type).map_or(0, HashMap::len)
    }

    /// Returns the number of hierarchy suppressors.
    pub fn hierarchy_count(&self) -> usize {
        self.hierarchy.len()
    }

    /// Returns load statistics for the current contents.
    pub fn stats(&self) -> LoadStats {
        LoadStats {
            definitions: self.definition_count(),
            weights: self.weight_count(),
            code_mappings: self
                .code_maps
                .values()
                .flat_map(HashMap::values)
                .map(Vec::len)
                .sum(),
            hierarchies: self.hierarchy_count(),
            group_members: self.groups.values().map(IndexMap::len).sum(),
            undefined_references: 0,
        }
    }

    /// Lists references to categories that have no definition.
    pub fn undefined_references(&self) -> Vec<String> {
        let mut undefined = Vec::new();
        let mut check = |context: &str, name: &str| {
            if !self.definitions.contains_key(name) {
                undefined.push(format!("{context} references undefined category {name}"));
            }
        };

        for code_type in CodeType::ALL {
            let Some(map) = self.code_maps.get(&code_type) else {
                continue;
            };
            let mut categories: Vec<&String> = map.values().flatten().collect();
            categories.sort_unstable();
            categories.dedup();
            for category in categories {
                check(&format!("{code_type:?} map"), category);
            }
        }
        for (suppressor, suppressed) in &self.hierarchy {
            check("hierarchy", suppressor);
            for name in suppressed {
                check("hierarchy", name);
            }
        }
        let mut segments: Vec<&String> = self.groups.keys().collect();
        segments.sort_unstable();
        for segment in segments {
            for (member, group) in &self.groups[segment] {
                check("group", member);
                check("group", group);
            }
        }

        undefined
    }
}

fn weight_layout(files: &ReferenceFiles) -> WeightLayout {
    match files.key.version.line_of_business() {
        LineOfBusiness::Medicare => WeightLayout::Flat,
        LineOfBusiness::Commercial => WeightLayout::Segmented,
    }
}

fn open(path: Option<&Path>, file_type: &str) -> LoadResult<(BufReader<File>, String)> {
    let path = path.ok_or_else(|| LoadError::FileNotFound {
        path: file_type.to_string(),
    })?;
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => LoadError::Io(e),
    })?;
    Ok((BufReader::new(file), path.display().to_string()))
}

fn read_definitions(path: Option<&Path>) -> LoadResult<Definitions> {
    let (reader, source) = open(path, "category_definition.json")?;
    parse_category_definitions(reader, &source)
}

fn read_weights(path: Option<&Path>, layout: WeightLayout) -> LoadResult<Vec<WeightRow>> {
    let (reader, _) = open(path, "weights.csv")?;
    parse_weights(reader, layout)
}

fn read_hierarchy(path: Option<&Path>) -> LoadResult<Hierarchy> {
    let (reader, source) = open(path, "hierarchy_definition.json")?;
    parse_hierarchy_definitions(reader, &source)
}

fn read_groups(path: Option<&Path>) -> LoadResult<Groups> {
    match path {
        Some(path) => {
            let (reader, source) = open(Some(path), "group_definition.json")?;
            parse_group_definitions(reader, &source)
        }
        None => Ok(Groups::new()),
    }
}

fn read_code_map(path: Option<&Path>) -> LoadResult<Vec<CodeMapping>> {
    match path {
        Some(path) => TableParser::<_, CodeMapping>::from_path(path)?.parse_all(),
        None => Ok(Vec::new()),
    }
}
