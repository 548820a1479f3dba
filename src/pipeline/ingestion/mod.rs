//! Reading the raw registry export into an in-memory table with canonical
//! column names.

use csv::ReaderBuilder;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

use crate::constants::{HEADER_RENAMES, REQUIRED_COLUMNS, UNNAMED_COLUMN_PREFIX};
use crate::error::{RegistryError, Result};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// One source row. Cells line up with `RawTable::columns`; `None` is an
/// empty cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 1-based line number in the source file
    pub line: u64,
    pub cells: Vec<Option<String>>,
}

/// The raw snapshot after header canonicalization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRecord>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Fail unless every column the pipeline reads is present
    pub fn require_columns(&self) -> Result<()> {
        for required in REQUIRED_COLUMNS {
            if self.column_index(required).is_none() {
                return Err(RegistryError::MissingColumn(required.to_string()));
            }
        }
        Ok(())
    }
}

/// Trim, lower-case and underscore a source header, then apply the known
/// renames (`ps/mc/uc` and the misspelled longitude column).
pub fn canonicalize_header(raw: &str) -> String {
    let trimmed = raw.trim_start_matches('\u{feff}').trim().to_lowercase();
    let underscored = WHITESPACE_RE.replace_all(&trimmed, "_").into_owned();

    HEADER_RENAMES
        .iter()
        .find(|(source, _)| *source == underscored)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(underscored)
}

/// Empty and whitespace-only cells are missing values
fn cell_value(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Parse CSV bytes into a `RawTable`.
///
/// Blank headers are named by position (`unnamed_<index>`). Short rows are
/// padded with missing cells. Rows with more cells than the header,
/// duplicate canonical headers and a missing header row are fatal.
pub fn read_raw_table(bytes: &[u8]) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(RegistryError::MissingColumn("header row".to_string()));
    }

    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, raw)| match canonicalize_header(raw) {
            blank if blank.is_empty() => format!("{}{}", UNNAMED_COLUMN_PREFIX, i),
            named => named,
        })
        .collect();
    let mut seen = HashSet::new();
    for column in &columns {
        if !seen.insert(column.as_str()) {
            return Err(RegistryError::DuplicateColumn(column.clone()));
        }
    }
    debug!("Canonical columns: {:?}", columns);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if record.len() > columns.len() {
            return Err(RegistryError::RaggedRow {
                line,
                expected: columns.len(),
                found: record.len(),
            });
        }

        let mut cells: Vec<Option<String>> = record.iter().map(cell_value).collect();
        cells.resize(columns.len(), None);
        rows.push(RawRecord { line, cells });
    }

    Ok(RawTable { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_header() {
        assert_eq!(canonicalize_header("  Name "), "name");
        assert_eq!(canonicalize_header("AGA Division"), "aga_division");
        assert_eq!(canonicalize_header("AGA   Division"), "aga_division");
        assert_eq!(canonicalize_header("PS/MC/UC"), "local_authority");
        assert_eq!(canonicalize_header(" Logitiute"), "longitude");
        assert_eq!(canonicalize_header("\u{feff}Name"), "name");
    }

    #[test]
    fn test_read_pads_short_rows_and_nulls_blank_cells() {
        let csv = "Name,District,Type\nA, colombo ,\nB\n";
        let table = read_raw_table(csv.as_bytes()).unwrap();

        assert_eq!(table.columns, vec!["name", "district", "type"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(
            table.rows[0].cells,
            vec![Some("A".to_string()), Some(" colombo ".to_string()), None]
        );
        assert_eq!(table.rows[1].cells, vec![Some("B".to_string()), None, None]);
        assert_eq!(table.rows[0].line, 2);
    }

    #[test]
    fn test_long_rows_are_fatal() {
        let csv = "Name,District\nA,B,C\n";
        let err = read_raw_table(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::RaggedRow { expected: 2, found: 3, .. }
        ));
    }

    #[test]
    fn test_duplicate_canonical_headers_are_fatal() {
        let csv = "Name, name \nA,B\n";
        let err = read_raw_table(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateColumn(c) if c == "name"));
    }

    #[test]
    fn test_blank_headers_are_named_by_position() {
        let csv = "Name,District,Address,,\nInn,Kandy,addr,,\n";
        let table = read_raw_table(csv.as_bytes()).unwrap();

        assert_eq!(
            table.columns,
            vec!["name", "district", "address", "unnamed_3", "unnamed_4"]
        );
        assert_eq!(table.rows[0].cells[2].as_deref(), Some("addr"));
        assert_eq!(table.rows[0].cells[3], None);
    }

    #[test]
    fn test_require_columns_names_the_first_missing_one() {
        let table = read_raw_table("Name,District\nA,B\n".as_bytes()).unwrap();
        let err = table.require_columns().unwrap_err();
        assert!(matches!(err, RegistryError::MissingColumn(c) if c == "type"));
    }
}
