//! JSON definition file parsers.
//!
//! Category definitions, hierarchy suppressions and group memberships are
//! published as JSON objects. Object order in the hierarchy file is the order
//! suppressors are applied in, so it is kept.

use std::collections::HashMap;
use std::io::Read;

use indexmap::IndexMap;
use risk_types::{CategoryDefinition, CategoryKind};
use serde::Deserialize;

use crate::types::{LoadError, LoadResult};

#[derive(Debug, Deserialize)]
struct RawDefinition {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    descr: String,
    #[serde(default)]
    number: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawHierarchy {
    #[serde(default)]
    remove_code: Vec<String>,
}

fn from_json<R: Read, T: serde::de::DeserializeOwned>(reader: R, source: &str) -> LoadResult<T> {
    serde_json::from_reader(reader).map_err(|e| LoadError::Json {
        path: source.to_string(),
        source: e,
    })
}

/// Parses `category_definition.json`.
pub fn parse_category_definitions<R: Read>(
    reader: R,
    source: &str,
) -> LoadResult<IndexMap<String, CategoryDefinition>> {
    let raw: IndexMap<String, RawDefinition> = from_json(reader, source)?;

    raw.into_iter()
        .map(|(name, definition)| {
            let kind = CategoryKind::from_code(&definition.kind).ok_or_else(|| {
                LoadError::InvalidCategoryKind {
                    category: name.clone(),
                    value: definition.kind.clone(),
                }
            })?;
            let number = match definition.number {
                Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
                Some(serde_json::Value::Number(n)) => Some(n.to_string()),
                _ => None,
            };
            Ok((
                name,
                CategoryDefinition {
                    kind,
                    description: definition.descr,
                    number,
                },
            ))
        })
        .collect()
}

/// Parses `hierarchy_definition.json` into suppressor -> suppressed, in file order.
pub fn parse_hierarchy_definitions<R: Read>(
    reader: R,
    source: &str,
) -> LoadResult<IndexMap<String, Vec<String>>> {
    let raw: IndexMap<String, RawHierarchy> = from_json(reader, source)?;
    Ok(raw
        .into_iter()
        .map(|(name, hierarchy)| (name, hierarchy.remove_code))
        .collect())
}

/// Parses `group_definition.json` into segment -> member -> group.
pub fn parse_group_definitions<R: Read>(
    reader: R,
    source: &str,
) -> LoadResult<HashMap<String, IndexMap<String, String>>> {
    from_json(reader, source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category_definitions() {
        let json = r#"{
            "HCC18": {"type": "disease", "descr": "Diabetes with Chronic Complications", "number": "18"},
            "M65_69": {"type": "demographic", "descr": "Male 65-69"},
            "RXC_01": {"type": "rx", "descr": "Anti-HIV Agents", "number": 1}
        }"#;

        let definitions = parse_category_definitions(json.as_bytes(), "test").unwrap();
        assert_eq!(definitions.len(), 3);

        let hcc18 = &definitions["HCC18"];
        assert_eq!(hcc18.kind, CategoryKind::Disease);
        assert_eq!(hcc18.number.as_deref(), Some("18"));

        assert!(definitions["M65_69"].number.is_none());
        assert_eq!(definitions["RXC_01"].kind, CategoryKind::Rx);
        assert_eq!(definitions["RXC_01"].number.as_deref(), Some("1"));
    }

    #[test]
    fn test_invalid_kind_rejected() {
        let json = r#"{"HCC18": {"type": "condition", "descr": "x"}}"#;
        let err = parse_category_definitions(json.as_bytes(), "test").unwrap_err();
        assert!(matches!(err, LoadError::InvalidCategoryKind { .. }));
    }

    #[test]
    fn test_hierarchy_order_preserved() {
        let json = r#"{
            "HCC17": {"remove_code": ["HCC18", "HCC19"]},
            "HCC8": {"remove_code": ["HCC9", "HCC10", "HCC11", "HCC12"]},
            "HCC18": {"remove_code": ["HCC19"]}
        }"#;

        let hierarchy = parse_hierarchy_definitions(json.as_bytes(), "test").unwrap();
        let order: Vec<&str> = hierarchy.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["HCC17", "HCC8", "HCC18"]);
        assert_eq!(hierarchy["HCC8"].len(), 4);
    }

    #[test]
    fn test_parse_group_definitions() {
        let json = r#"{
            "Adult": {"HHS_HCC019": "G01", "HHS_HCC020": "G01"},
            "Child": {"HHS_HCC019": "G01"}
        }"#;

        let groups = parse_group_definitions(json.as_bytes(), "test").unwrap();
        assert_eq!(groups["Adult"].len(), 2);
        assert_eq!(groups["Child"]["HHS_HCC019"], "G01");
    }

    #[test]
    fn test_malformed_json_reports_source() {
        let err = parse_hierarchy_definitions("{".as_bytes(), "hierarchy_definition.json").unwrap_err();
        assert!(err.to_string().contains("hierarchy_definition.json"));
    }
}
