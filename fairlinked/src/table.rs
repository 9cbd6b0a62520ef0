//! Row-oriented tabular input.

use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// A header row plus string cells; every row has one cell per column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table, padding or truncating rows to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Reads a CSV file with a header row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Table`] if the file cannot be opened or a record is malformed.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let table_err = |source| Error::Table {
            path: path.to_path_buf(),
            source,
        };
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(table_err)?;
        let table = Self::from_csv(reader).map_err(table_err)?;
        tracing::debug!(path = %path.display(), rows = table.len(), columns = table.columns.len(), "read table");
        Ok(table)
    }

    /// Reads CSV with a header row from any reader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Table`] on malformed input.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        Self::from_csv(reader).map_err(|source| Error::Table {
            path: "<reader>".into(),
            source,
        })
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> std::result::Result<Self, csv::Error> {
        let columns: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_owned()).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            rows.push(record.iter().map(|c| c.trim().to_owned()).collect());
        }
        Ok(Self::new(columns, rows))
    }

    /// Column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Position of a column.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at (`row`, `column`), `None` when out of range or blank.
    #[must_use]
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows
            .get(row)
            .map(|r| r[col].as_str())
            .filter(|v| !v.is_empty())
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_header_and_pads_short_rows() {
        let csv = "ExperimentId,Temperature\nEXP001,25.0\nEXP002\n,\n";
        let table = Table::from_reader(csv.as_bytes()).expect("valid csv");
        assert_eq!(table.columns(), ["ExperimentId", "Temperature"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(0, "Temperature"), Some("25.0"));
        assert_eq!(table.value(1, "Temperature"), None);
        assert_eq!(table.value(5, "Temperature"), None);
    }
}
