//! Generic reference table parser.
//!
//! Provides a streaming parser for headered, delimited reference files.

use std::fs::File;
use std::io::{BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};

use crate::types::{LoadError, LoadResult};

/// Trait for types that can be parsed from a reference table row.
pub trait TableRecord: Sized {
    /// Expected column names for this record type.
    const EXPECTED_COLUMNS: &'static [&'static str];

    /// Field delimiter.
    const DELIMITER: u8 = b'\t';

    /// Parse a record from a CSV StringRecord.
    fn from_record(record: &StringRecord) -> LoadResult<Self>;
}

/// A streaming parser for reference table files.
pub struct TableParser<R: Read, T: TableRecord> {
    reader: Reader<R>,
    records_read: usize,
    _marker: PhantomData<T>,
}

impl<T: TableRecord> TableParser<BufReader<File>, T> {
    /// Creates a new parser from a file path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or has invalid headers.
    pub fn from_path<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(LoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read, T: TableRecord> TableParser<R, T> {
    /// Creates a new parser from a reader.
    pub fn from_reader(reader: R) -> LoadResult<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(T::DELIMITER)
            .has_headers(true)
            .flexible(false)
            .trim(csv::Trim::All)
            .from_reader(reader);

        Self::validate_headers(&mut csv_reader)?;

        Ok(Self {
            reader: csv_reader,
            records_read: 0,
            _marker: PhantomData,
        })
    }

    /// Validates that the file has the expected column headers.
    fn validate_headers(reader: &mut Reader<R>) -> LoadResult<()> {
        let headers = reader.headers()?;
        validate_columns(headers, T::EXPECTED_COLUMNS)
    }

    /// Returns the number of records read so far.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Parses all records into a Vec.
    ///
    /// Stops at the first malformed record.
    pub fn parse_all(self) -> LoadResult<Vec<T>> {
        self.collect()
    }
}

impl<R: Read, T: TableRecord> Iterator for TableParser<R, T> {
    type Item = LoadResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut record = StringRecord::new();
            match self.reader.read_record(&mut record) {
                Ok(true) => {
                    self.records_read += 1;

                    // Skip empty records
                    if record.is_empty() || record.iter().all(|f| f.trim().is_empty()) {
                        continue;
                    }

                    return Some(T::from_record(&record));
                }
                Ok(false) => return None,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Checks that a header row starts with the expected column names.
pub(crate) fn validate_columns(headers: &StringRecord, expected: &[&str]) -> LoadResult<()> {
    if headers.len() < expected.len() {
        return Err(LoadError::InvalidHeader {
            expected: expected.len(),
            found: headers.len(),
        });
    }

    for (i, expected_col) in expected.iter().enumerate() {
        let found = headers.get(i).unwrap_or("");
        // Handle UTF-8 BOM at start of file
        let found = found.trim_start_matches('\u{feff}');
        if !found.eq_ignore_ascii_case(expected_col) {
            return Err(LoadError::UnexpectedColumn {
                position: i,
                expected: expected_col.to_string(),
                found: found.to_string(),
            });
        }
    }

    Ok(())
}

/// Helper functions for parsing reference table field values.
pub mod parse {
    use super::{LoadError, LoadResult};

    /// Parses a weight cell. Empty cells mean "no weight for this column".
    pub fn weight(category: &str, population: &str, value: &str) -> LoadResult<Option<f64>> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        value
            .parse::<f64>()
            .map(Some)
            .map_err(|_| LoadError::InvalidWeight {
                category: category.to_string(),
                population: population.to_string(),
                value: value.to_string(),
            })
    }

    /// Normalises a billing code: surrounding whitespace and dots removed, upper case.
    pub fn code(value: &str) -> String {
        value
            .trim()
            .chars()
            .filter(|c| *c != '.')
            .map(|c| c.to_ascii_uppercase())
            .collect()
    }

    /// Parses a model year directory name.
    pub fn year(value: &str) -> Option<u16> {
        if value.len() == 4 && value.chars().all(|c| c.is_ascii_digit()) {
            value.parse().ok()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse::weight("HCC18", "CNA", "0.302").unwrap(), Some(0.302));
        assert_eq!(parse::weight("HCC18", "CNA", "  ").unwrap(), None);
        assert!(parse::weight("HCC18", "CNA", "n/a").is_err());
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(parse::code(" e11.69 "), "E1169");
        assert_eq!(parse::code("00002143380"), "00002143380");
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse::year("2024"), Some(2024));
        assert_eq!(parse::year("24"), None);
        assert_eq!(parse::year("latest"), None);
    }

    #[test]
    fn test_validate_columns() {
        let headers = StringRecord::from(vec!["\u{feff}code", "category"]);
        assert!(validate_columns(&headers, &["code", "category"]).is_ok());

        let headers = StringRecord::from(vec!["code"]);
        assert!(matches!(
            validate_columns(&headers, &["code", "category"]),
            Err(LoadError::InvalidHeader { expected: 2, found: 1 })
        ));

        let headers = StringRecord::from(vec!["diag", "category"]);
        assert!(matches!(
            validate_columns(&headers, &["code", "category"]),
            Err(LoadError::UnexpectedColumn { position: 0, .. })
        ));
    }
}
