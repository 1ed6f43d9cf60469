//! # risk-loader
//!
//! Reference table loader for health-plan risk adjustment models.
//!
//! Reference tables live under `<root>/<line-of-business>/<version>/<year>/`
//! and hold category definitions, population weights, code-to-category maps,
//! and hierarchy and group suppression tables. This crate discovers those
//! files, parses them into an immutable [`ReferenceTables`] value and caches
//! loaded tables by model version and year.
//!
//! ## Features
//!
//! - `parallel` (default): Loads independent files concurrently with rayon.
//!
//! ## Usage
//!
//! ```ignore
//! use risk_loader::{discover_reference_files, ReferenceTables};
//! use risk_types::ModelVersion;
//!
//! let files = discover_reference_files("/data/risk", ModelVersion::MedicareV28, None)?;
//! let tables = ReferenceTables::load(&files)?;
//! println!("{} categories for {}", tables.definition_count(), files.key);
//! ```

#![warn(missing_docs)]

mod cache;
mod code_map;
mod definitions;
mod loader;
pub mod parser;
mod tables;
mod types;
mod weights;

pub use cache::TableCache;
pub use code_map::CodeMapping;
pub use definitions::{parse_category_definitions, parse_group_definitions, parse_hierarchy_definitions};
pub use loader::{available_years, discover_reference_files, model_directory};
pub use parser::{TableParser, TableRecord};
pub use tables::ReferenceTables;
pub use types::{LoadConfig, LoadError, LoadResult, LoadStats, ReferenceFiles};
pub use weights::{parse_weights, WeightLayout, WeightRow};

// Re-export risk-types for convenience
pub use risk_types;
