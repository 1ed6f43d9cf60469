//! Process-wide cache of loaded reference tables.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use risk_types::{ModelKey, ModelVersion};

use crate::loader::discover_reference_files;
use crate::tables::ReferenceTables;
use crate::types::{LoadConfig, LoadResult};

/// Loads reference tables once per (model version, model year) and shares them.
///
/// Tables are handed out as `Arc<ReferenceTables>` and never mutated after
/// load, so any number of scoring calls may read them concurrently.
#[derive(Debug)]
pub struct TableCache {
    root: PathBuf,
    config: LoadConfig,
    tables: RwLock<HashMap<ModelKey, Arc<ReferenceTables>>>,
}

impl TableCache {
    /// Creates a cache over a reference data root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, LoadConfig::default())
    }

    /// Creates a cache with a custom load configuration.
    pub fn with_config(root: impl Into<PathBuf>, config: LoadConfig) -> Self {
        Self {
            root: root.into(),
            config,
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the reference data root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the tables for a version and year, loading them on first use.
    ///
    /// When `year` is `None` the newest available year is used.
    pub fn get_or_load(
        &self,
        version: ModelVersion,
        year: Option<u16>,
    ) -> LoadResult<Arc<ReferenceTables>> {
        if let Some(year) = year {
            if let Some(tables) = self.get(ModelKey::new(version, year)) {
                return Ok(tables);
            }
        }

        let files = discover_reference_files(&self.root, version, year)?;
        if let Some(tables) = self.get(files.key) {
            return Ok(tables);
        }

        let (tables, _) = ReferenceTables::load_with_config(&files, &self.config)?;
        let mut cache = self.tables.write().unwrap_or_else(|e| e.into_inner());
        let tables = cache.entry(files.key).or_insert_with(|| Arc::new(tables));
        Ok(Arc::clone(tables))
    }

    /// Returns already-loaded tables.
    pub fn get(&self, key: ModelKey) -> Option<Arc<ReferenceTables>> {
        let cache = self.tables.read().unwrap_or_else(|e| e.into_inner());
        cache.get(&key).cloned()
    }

    /// Inserts tables built elsewhere, replacing any cached entry.
    pub fn insert(&self, key: ModelKey, tables: ReferenceTables) -> Arc<ReferenceTables> {
        let tables = Arc::new(tables);
        let mut cache = self.tables.write().unwrap_or_else(|e| e.into_inner());
        cache.insert(key, Arc::clone(&tables));
        tables
    }

    /// Returns the keys currently loaded.
    pub fn loaded_keys(&self) -> Vec<ModelKey> {
        let cache = self.tables.read().unwrap_or_else(|e| e.into_inner());
        let mut keys: Vec<ModelKey> = cache.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::loader::model_directory;

    fn write_minimal(root: &Path, version: ModelVersion, year: u16) {
        let dir = model_directory(root, version).join(year.to_string());
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("category_definition.json"),
            r#"{"HCC18": {"type": "disease", "descr": "Diabetes"}}"#,
        )
        .unwrap();
        fs::write(dir.join("weights.csv"), "category,CNA\nHCC18,0.302\n").unwrap();
        fs::write(dir.join("hierarchy_definition.json"), "{}").unwrap();
        fs::write(dir.join("diag_category_map.txt"), "code\tcategory\nE1169\tHCC18\n").unwrap();
    }

    #[test]
    fn test_get_or_load_caches() {
        let dir = tempfile::tempdir().unwrap();
        write_minimal(dir.path(), ModelVersion::MedicareV24, 2023);
        write_minimal(dir.path(), ModelVersion::MedicareV24, 2024);

        let cache = TableCache::new(dir.path());
        let latest = cache.get_or_load(ModelVersion::MedicareV24, None).unwrap();
        assert_eq!(latest.key(), Some(ModelKey::new(ModelVersion::MedicareV24, 2024)));

        let again = cache.get_or_load(ModelVersion::MedicareV24, Some(2024)).unwrap();
        assert!(Arc::ptr_eq(&latest, &again));

        cache.get_or_load(ModelVersion::MedicareV24, Some(2023)).unwrap();
        assert_eq!(cache.loaded_keys().len(), 2);
    }

    #[test]
    fn test_insert_prebuilt_tables() {
        let cache = TableCache::new("/nonexistent");
        let key = ModelKey::new(ModelVersion::CommercialV07, 2025);
        cache.insert(key, ReferenceTables::with_key(key));

        let tables = cache.get_or_load(ModelVersion::CommercialV07, Some(2025)).unwrap();
        assert_eq!(tables.key(), Some(key));
        assert!(cache.get(ModelKey::new(ModelVersion::CommercialV07, 2024)).is_none());
    }

    #[test]
    fn test_missing_root_is_error() {
        let cache = TableCache::new("/nonexistent/risk-data");
        assert!(cache.get_or_load(ModelVersion::MedicareV28, None).is_err());
    }
}
