use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

/// A raw tabular dataset: ordered rows of string cells.
///
/// Rows may have uneven lengths and a missing cell reads as the empty
/// string. The table is immutable once parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { rows })
    }

    pub fn from_csv_str(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// The cell at (row, col), or `""` when the row is short or absent.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }
}
