//! Grid rows, duplicate detection and the identifier lookup.
//!
//! A [`DataRow`] is one line of the pasted grid keyed by column name. Reads
//! of absent fields yield the empty string so half-typed rows stay usable.
//! [`read_grid()`] loads a CSV grid and checks the columns an operation
//! needs are present before any row reaches the checks.

use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{error::CheckError, io_utils};

pub const ECODE_FIELD: &str = "ecode";
pub const LABEL_FIELD: &str = "label";
pub const DATA_FIELD: &str = "data";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataRow {
    fields: BTreeMap<String, String>,
}

/// Rows keyed by their trimmed identifier.
pub type DataLookup = BTreeMap<String, DataRow>;

impl DataRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: &str) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: &str) {
        self.fields.insert(field.to_string(), value.to_string());
    }

    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn data(&self) -> &str {
        self.get(DATA_FIELD)
    }

    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|value| value.trim().is_empty())
    }

    pub fn trimmed(&self) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .map(|(field, value)| (field.clone(), value.trim().to_string()))
                .collect(),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for DataRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Keys that occur more than once among rows whose trimmed `key_field` is
/// non-blank, in the order they first repeat.
pub fn find_duplicates(rows: &[DataRow], key_field: &str) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut duplicates = Vec::new();
    for row in rows {
        let key = row.get(key_field).trim();
        if key.is_empty() {
            continue;
        }
        let count = counts.entry(key).or_insert(0);
        *count += 1;
        if *count == 2 {
            duplicates.push(key.to_string());
        }
    }
    duplicates
}

pub fn check_duplicates(rows: &[DataRow], key_field: &str) -> Result<(), CheckError> {
    let duplicates = find_duplicates(rows, key_field);
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(CheckError::DuplicateRows(duplicates))
    }
}

/// Keys non-blank rows by their trimmed `id_field`, trimming every value.
pub fn build_data_lookup(rows: &[DataRow], id_field: &str) -> DataLookup {
    rows.iter()
        .filter(|row| !row.is_blank())
        .map(|row| {
            let trimmed = row.trimmed();
            (trimmed.get(id_field).to_string(), trimmed)
        })
        .collect()
}

pub fn read_grid(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
    required: &[&str],
) -> Result<Vec<DataRow>> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)?
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect::<Vec<_>>();
    for column in required {
        if !headers.iter().any(|h| h == column) {
            return Err(CheckError::MissingColumn(column.to_string()))
                .with_context(|| format!("Validating grid headers for {path:?}"));
        }
    }

    let mut rows = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {} in {path:?}", row_idx + 2))?;
        let decoded = io_utils::decode_record(&record, encoding)?;
        let row = headers
            .iter()
            .zip(decoded)
            .map(|(header, value)| (header.as_str(), value))
            .collect::<DataRow>();
        rows.push(row);
    }
    debug!("Read {} grid row(s) from {path:?}", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed(keys: &[&str]) -> Vec<DataRow> {
        keys.iter()
            .map(|k| DataRow::new().with(ECODE_FIELD, k))
            .collect()
    }

    #[test]
    fn duplicates_reported_on_second_occurrence() {
        let rows = keyed(&["A", "B", " A", "C", "B ", "B"]);
        assert_eq!(find_duplicates(&rows, ECODE_FIELD), vec!["A", "B"]);
    }

    #[test]
    fn blank_keys_never_duplicate() {
        let rows = keyed(&["", " ", "", "X"]);
        assert!(check_duplicates(&rows, ECODE_FIELD).is_ok());
    }

    #[test]
    fn missing_key_field_reads_as_blank() {
        let rows = vec![DataRow::new().with(DATA_FIELD, "1"); 3];
        assert!(find_duplicates(&rows, ECODE_FIELD).is_empty());
    }

    #[test]
    fn lookup_skips_blank_rows_and_trims_values() {
        let rows = vec![
            DataRow::new().with(ECODE_FIELD, " E07000008 ").with(DATA_FIELD, " 4 "),
            DataRow::new().with(ECODE_FIELD, "  ").with(DATA_FIELD, ""),
        ];
        let lookup = build_data_lookup(&rows, ECODE_FIELD);
        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup["E07000008"].data(), "4");
    }
}
