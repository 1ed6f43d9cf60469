//! Loader-specific types for reference table processing.

use std::path::PathBuf;

use risk_types::ModelKey;
use thiserror::Error;

/// Errors that can occur while loading reference tables.
#[derive(Error, Debug)]
pub enum LoadError {
    /// I/O error reading a reference file.
    #[error("IO error reading reference file: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing error.
    #[error("JSON parsing error in {path}: {source}")]
    Json {
        /// The file being parsed.
        path: String,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Required file missing from a model year directory.
    #[error("Required reference file not found: {file_type} in {directory}")]
    RequiredFileMissing {
        /// The files that were missing.
        file_type: String,
        /// The directory that was searched.
        directory: String,
    },

    /// No model year directories exist for a version.
    #[error("No model years found in {directory}")]
    NoModelYears {
        /// The version directory that was searched.
        directory: String,
    },

    /// Invalid header - column count mismatch.
    #[error("Invalid header: expected {expected} columns, found {found}")]
    InvalidHeader {
        /// Expected column count.
        expected: usize,
        /// Found column count.
        found: usize,
    },

    /// Unexpected column name.
    #[error("Unexpected column '{found}' at position {position}, expected '{expected}'")]
    UnexpectedColumn {
        /// The column position.
        position: usize,
        /// Expected column name.
        expected: String,
        /// Found column name.
        found: String,
    },

    /// A weight cell is not a number.
    #[error("Invalid weight '{value}' for {category} in column {population}")]
    InvalidWeight {
        /// Category row.
        category: String,
        /// Population column.
        population: String,
        /// The cell contents.
        value: String,
    },

    /// Unknown category kind in a definition file.
    #[error("Invalid category kind '{value}' for {category}")]
    InvalidCategoryKind {
        /// Category being defined.
        category: String,
        /// The kind string.
        value: String,
    },

    /// A segmented weight row has no recognised segment prefix.
    #[error("Unknown age segment in weight row '{category}'")]
    UnknownSegment {
        /// The weight row label.
        category: String,
    },

    /// Tables reference categories they do not define (strict mode only).
    #[error("Inconsistent reference tables: {0}")]
    Inconsistent(String),
}

/// Result type for loader operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Configuration for loading reference tables.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Load independent files concurrently when the `parallel` feature is on.
    pub parallel: bool,
    /// Fail the load when tables reference undefined categories.
    pub strict: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            strict: false,
        }
    }
}

/// Statistics from loading one set of reference tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Category definitions loaded.
    pub definitions: usize,
    /// (category, population) weights loaded.
    pub weights: usize,
    /// Code-to-category rows loaded across all code types.
    pub code_mappings: usize,
    /// Hierarchy suppressor entries loaded.
    pub hierarchies: usize,
    /// Group membership rows loaded.
    pub group_members: usize,
    /// References to undefined categories found during validation.
    pub undefined_references: usize,
}

/// Discovered reference files for one model version and year.
#[derive(Debug, Clone)]
pub struct ReferenceFiles {
    /// Model version and year the files belong to.
    pub key: ModelKey,
    /// The model year directory.
    pub directory: PathBuf,
    /// Path to `category_definition.json`.
    pub category_definitions: Option<PathBuf>,
    /// Path to `weights.csv`.
    pub weights: Option<PathBuf>,
    /// Path to `hierarchy_definition.json`.
    pub hierarchy: Option<PathBuf>,
    /// Path to `group_definition.json`.
    pub groups: Option<PathBuf>,
    /// Path to `diag_category_map.txt`.
    pub diagnosis_map: Option<PathBuf>,
    /// Path to `ndc_category_map.txt`.
    pub ndc_map: Option<PathBuf>,
    /// Path to `proc_category_map.txt`.
    pub procedure_map: Option<PathBuf>,
}

impl ReferenceFiles {
    /// Creates an empty file set for a model year directory.
    pub fn new(key: ModelKey, directory: impl Into<PathBuf>) -> Self {
        Self {
            key,
            directory: directory.into(),
            category_definitions: None,
            weights: None,
            hierarchy: None,
            groups: None,
            diagnosis_map: None,
            ndc_map: None,
            procedure_map: None,
        }
    }

    /// Returns true if all required files are present.
    pub fn has_required_files(&self) -> bool {
        self.missing_files().is_empty()
    }

    /// Returns a list of missing required files.
    pub fn missing_files(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.category_definitions.is_none() {
            missing.push("CategoryDefinition");
        }
        if self.weights.is_none() {
            missing.push("Weights");
        }
        if self.hierarchy.is_none() {
            missing.push("HierarchyDefinition");
        }
        if self.diagnosis_map.is_none() {
            missing.push("DiagnosisCategoryMap");
        }
        missing
    }
}
