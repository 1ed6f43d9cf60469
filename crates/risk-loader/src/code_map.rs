//! Code-to-category map parser.
//!
//! Parses `diag_category_map.txt`, `ndc_category_map.txt` and
//! `proc_category_map.txt`: tab-delimited `code`/`category` rows, one row per
//! category a code maps to.

use csv::StringRecord;

use crate::parser::{parse, TableRecord};
use crate::types::LoadResult;

/// Expected columns in a code map file.
const CODE_MAP_COLUMNS: &[&str] = &["code", "category"];

/// One row of a code-to-category map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeMapping {
    /// Normalised billing code.
    pub code: String,
    /// Category the code maps to.
    pub category: String,
}

impl TableRecord for CodeMapping {
    const EXPECTED_COLUMNS: &'static [&'static str] = CODE_MAP_COLUMNS;

    fn from_record(record: &StringRecord) -> LoadResult<Self> {
        Ok(CodeMapping {
            code: parse::code(record.get(0).unwrap_or("")),
            category: record.get(1).unwrap_or("").trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TableParser;

    #[test]
    fn test_parse_code_mapping_record() {
        let record = StringRecord::from(vec!["E11.69", "HCC18"]);
        let mapping = CodeMapping::from_record(&record).unwrap();
        assert_eq!(mapping.code, "E1169");
        assert_eq!(mapping.category, "HCC18");
    }

    #[test]
    fn test_parse_code_map_file() {
        let data = "code\tcategory\nE1169\tHCC37\nE1169\tHCC18\n\nI509\tHCC85\n";
        let parser = TableParser::<_, CodeMapping>::from_reader(data.as_bytes()).unwrap();
        let rows = parser.parse_all().unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].category, "HCC37");
        assert_eq!(rows[1].code, "E1169");
        assert_eq!(rows[2].category, "HCC85");
    }

    #[test]
    fn test_rejects_wrong_header() {
        let data = "diagnosis\tcategory\nE1169\tHCC18\n";
        assert!(TableParser::<_, CodeMapping>::from_reader(data.as_bytes()).is_err());
    }
}
