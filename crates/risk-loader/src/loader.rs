//! Reference file discovery.

use std::fs;
use std::path::{Path, PathBuf};

use risk_types::{ModelKey, ModelVersion};

use crate::parser::parse;
use crate::types::{LoadError, LoadResult, ReferenceFiles};

const CATEGORY_DEFINITION_FILE: &str = "category_definition.json";
const WEIGHTS_FILE: &str = "weights.csv";
const HIERARCHY_DEFINITION_FILE: &str = "hierarchy_definition.json";
const GROUP_DEFINITION_FILE: &str = "group_definition.json";
const DIAGNOSIS_MAP_FILE: &str = "diag_category_map.txt";
const NDC_MAP_FILE: &str = "ndc_category_map.txt";
const PROCEDURE_MAP_FILE: &str = "proc_category_map.txt";

/// Returns `<root>/<line-of-business>/<version>` for a model version.
pub fn model_directory<P: AsRef<Path>>(root: P, version: ModelVersion) -> PathBuf {
    root.as_ref()
        .join(version.line_of_business().code())
        .join(version.code())
}

/// Lists the model years available for a version, oldest first.
pub fn available_years<P: AsRef<Path>>(root: P, version: ModelVersion) -> LoadResult<Vec<u16>> {
    let directory = model_directory(root, version);

    if !directory.is_dir() {
        return Err(LoadError::DirectoryNotFound {
            path: directory.display().to_string(),
        });
    }

    let mut years = Vec::new();
    for entry in fs::read_dir(&directory)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(year) = parse::year(&entry.file_name().to_string_lossy()) {
            years.push(year);
        }
    }

    years.sort_unstable();
    Ok(years)
}

/// Discovers the reference files for a model version and year.
///
/// When `year` is `None` the newest year directory is used.
pub fn discover_reference_files<P: AsRef<Path>>(
    root: P,
    version: ModelVersion,
    year: Option<u16>,
) -> LoadResult<ReferenceFiles> {
    let root = root.as_ref();

    if !root.exists() {
        return Err(LoadError::DirectoryNotFound {
            path: root.display().to_string(),
        });
    }

    let year = match year {
        Some(year) => year,
        None => latest_year(root, version)?,
    };

    let directory = model_directory(root, version).join(year.to_string());
    if !directory.is_dir() {
        return Err(LoadError::DirectoryNotFound {
            path: directory.display().to_string(),
        });
    }

    let mut files = ReferenceFiles::new(ModelKey::new(version, year), &directory);

    for entry in fs::read_dir(&directory)? {
        let entry = entry?;
        let filename = entry.file_name();
        let path = Some(entry.path());

        match filename.to_string_lossy().as_ref() {
            CATEGORY_DEFINITION_FILE => files.category_definitions = path,
            WEIGHTS_FILE => files.weights = path,
            HIERARCHY_DEFINITION_FILE => files.hierarchy = path,
            GROUP_DEFINITION_FILE => files.groups = path,
            DIAGNOSIS_MAP_FILE => files.diagnosis_map = path,
            NDC_MAP_FILE => files.ndc_map = path,
            PROCEDURE_MAP_FILE => files.procedure_map = path,
            _ => {}
        }
    }

    if !files.has_required_files() {
        let missing = files.missing_files();
        return Err(LoadError::RequiredFileMissing {
            file_type: missing.join(", "),
            directory: directory.display().to_string(),
        });
    }

    Ok(files)
}

fn latest_year(root: &Path, version: ModelVersion) -> LoadResult<u16> {
    available_years(root, version)?
        .last()
        .copied()
        .ok_or_else(|| LoadError::NoModelYears {
            directory: model_directory(root, version).display().to_string(),
        })
}
