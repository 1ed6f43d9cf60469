//! Weight table parser.
//!
//! `weights.csv` is comma-delimited with a `category` column followed by one
//! column per population. Commercial tables prefix each category with its age
//! segment (`Adult_HHS_HCC001`); the segment is folded into the population
//! key so that every weight is addressed by `(category, population)`.

use std::io::Read;

use csv::ReaderBuilder;
use risk_types::AgeSegment;

use crate::parser::{parse, validate_columns};
use crate::types::{LoadError, LoadResult};

/// How category rows in a weight table are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightLayout {
    /// Row label is the category; population is the column header.
    Flat,
    /// Row label is `<Segment>_<category>`; population is `<Segment>_<column>`.
    Segmented,
}

/// One resolved weight.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightRow {
    /// Category name.
    pub category: String,
    /// Population key.
    pub population: String,
    /// Coefficient.
    pub weight: f64,
}

/// Parses a weight table.
///
/// Empty cells are skipped: a category without a weight for a population is
/// reported at scoring time, not here.
pub fn parse_weights<R: Read>(reader: R, layout: WeightLayout) -> LoadResult<Vec<WeightRow>> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    validate_columns(&headers, &["category"])?;
    let populations: Vec<&str> = headers.iter().skip(1).collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let label = record.get(0).unwrap_or("");
        if label.is_empty() {
            continue;
        }

        let (segment, category) = match layout {
            WeightLayout::Flat => (None, label),
            WeightLayout::Segmented => {
                let (segment, category) = split_segment(label)?;
                (Some(segment), category)
            }
        };

        for (population, value) in populations.iter().zip(record.iter().skip(1)) {
            let Some(weight) = parse::weight(label, population, value)? else {
                continue;
            };
            let population = match segment {
                Some(segment) => format!("{}_{}", segment.code(), population.to_ascii_lowercase()),
                None => population.to_string(),
            };
            rows.push(WeightRow {
                category: category.to_string(),
                population,
                weight,
            });
        }
    }

    Ok(rows)
}

/// Splits `Adult_HHS_HCC001` into its segment and category.
fn split_segment(label: &str) -> LoadResult<(AgeSegment, &str)> {
    label
        .split_once('_')
        .and_then(|(prefix, category)| AgeSegment::from_code(prefix).map(|s| (s, category)))
        .ok_or_else(|| LoadError::UnknownSegment {
            category: label.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_weights() {
        let data = "category,CNA,INS\nHCC18,0.302,0.425\nM65_69,0.309,\n";
        let rows = parse_weights(data.as_bytes(), WeightLayout::Flat).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            WeightRow {
                category: "HCC18".to_string(),
                population: "CNA".to_string(),
                weight: 0.302,
            }
        );
        assert_eq!(rows[1].population, "INS");
        assert_eq!(rows[2].category, "M65_69");
    }

    #[test]
    fn test_parse_segmented_weights() {
        let data = "category,Platinum,Silver\nAdult_HHS_HCC001,0.5,0.4\nChild_G01,0.2,0.1\n";
        let rows = parse_weights(data.as_bytes(), WeightLayout::Segmented).unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].category, "HHS_HCC001");
        assert_eq!(rows[0].population, "Adult_platinum");
        assert_eq!(rows[3].category, "G01");
        assert_eq!(rows[3].population, "Child_silver");
    }

    #[test]
    fn test_unknown_segment_rejected() {
        let data = "category,silver\nSenior_HHS_HCC001,0.5\n";
        let err = parse_weights(data.as_bytes(), WeightLayout::Segmented).unwrap_err();
        assert!(matches!(err, LoadError::UnknownSegment { .. }));
    }

    #[test]
    fn test_invalid_weight_rejected() {
        let data = "category,CNA\nHCC18,abc\n";
        let err = parse_weights(data.as_bytes(), WeightLayout::Flat).unwrap_err();
        assert!(matches!(err, LoadError::InvalidWeight { .. }));
    }
}
