//! Locates a named entity's rows inside a raw tabular dataset and answers
//! column-lookup queries against them.
//!
//! A block starts at the first row whose first cell contains the entity name
//! (case-insensitive substring). The row immediately after is the block's
//! header row; data rows follow until a row's first cell is empty or stops
//! looking like a period label.

use std::ops::Range;

use chrono::NaiveDate;
use log::debug;

use crate::dates;
use crate::error::{AssistantError, Result};
use crate::table::Table;

/// How a block's data rows label their period column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodLabel {
    /// Rows are keyed by a date (valuation and forecast blocks).
    Date,
    /// Rows are keyed by a numeric year (ratio blocks).
    Year,
}

impl PeriodLabel {
    fn matches(self, cell: &str) -> bool {
        match self {
            PeriodLabel::Date => dates::parse_flexible(cell).is_some(),
            PeriodLabel::Year => cell.trim().replace(',', "").parse::<f64>().is_ok(),
        }
    }
}

/// A resolved cell together with the period label of its row, canonicalized
/// where the label parses as a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedValue {
    pub value: String,
    pub period: String,
}

/// One entity's contiguous sub-range of a table.
#[derive(Debug, Clone)]
pub struct EntityBlock<'a> {
    table: &'a Table,
    marker_row: usize,
    header_row: usize,
    data: Range<usize>,
}

/// Scan `table` top to bottom for the block belonging to `entity_name`.
///
/// The first qualifying marker row wins; additional markers are noted at
/// debug level and ignored. Resolution fails when no row qualifies or the
/// marker is the table's last row (no header row can follow it).
pub fn find_entity_block<'a>(
    table: &'a Table,
    entity_name: &str,
    label: PeriodLabel,
) -> Result<EntityBlock<'a>> {
    let needle = entity_name.to_lowercase();
    let mut marker = None;
    for index in 0..table.len() {
        let first = table.cell(index, 0);
        if !first.is_empty() && first.to_lowercase().contains(&needle) {
            match marker {
                None => marker = Some(index),
                Some(first_hit) => {
                    debug!(
                        "duplicate marker for '{entity_name}' at row {index}, keeping row {first_hit}"
                    );
                }
            }
        }
    }

    let marker_row = marker.ok_or_else(|| AssistantError::EntityNotFound(entity_name.to_string()))?;
    let header_row = marker_row + 1;
    if header_row >= table.len() {
        return Err(AssistantError::EntityNotFound(entity_name.to_string()));
    }

    let mut end = header_row + 1;
    while end < table.len() {
        let first = table.cell(end, 0);
        if first.trim().is_empty() || !label.matches(first) {
            break;
        }
        end += 1;
    }

    Ok(EntityBlock {
        table,
        marker_row,
        header_row,
        data: header_row + 1..end,
    })
}

impl<'a> EntityBlock<'a> {
    pub fn marker_row(&self) -> usize {
        self.marker_row
    }

    pub fn header_row(&self) -> usize {
        self.header_row
    }

    pub fn data_rows(&self) -> Range<usize> {
        self.data.clone()
    }

    /// The period label (first cell) of a data row.
    pub fn label(&self, row: usize) -> &str {
        self.table.cell(row, 0)
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.table.cell(row, col)
    }

    /// Index of the first header cell containing `label`, case-insensitive.
    pub fn column(&self, label: &str) -> Result<usize> {
        let needle = label.to_lowercase();
        self.table
            .row(self.header_row)
            .and_then(|header| {
                header
                    .iter()
                    .position(|cell| cell.to_lowercase().contains(&needle))
            })
            .ok_or_else(|| AssistantError::ColumnNotFound(label.to_string()))
    }

    /// First non-empty cell in the `header_label` column whose row label
    /// satisfies `row_matches`.
    pub fn lookup_column_value<F>(&self, header_label: &str, mut row_matches: F) -> Result<ResolvedValue>
    where
        F: FnMut(&str) -> bool,
    {
        let col = self.column(header_label)?;
        for row in self.data_rows() {
            let label = self.label(row);
            if row_matches(label) {
                let value = self.cell(row, col);
                if !value.is_empty() {
                    return Ok(ResolvedValue {
                        value: value.to_string(),
                        period: canonical_label(label),
                    });
                }
            }
        }
        Err(AssistantError::ValueNotFound(header_label.to_string()))
    }

    /// The value for an exact date in the `header_label` column.
    pub fn value_on_date(&self, header_label: &str, date: NaiveDate) -> Result<ResolvedValue> {
        self.lookup_column_value(header_label, |label| {
            dates::parse_flexible(label) == Some(date)
        })
    }

    /// The value from the most recent row, by parsed date, in the
    /// `header_label` column. Rows with unparseable labels are skipped.
    pub fn latest_in_column(&self, header_label: &str) -> Result<ResolvedValue> {
        let col = self.column(header_label)?;
        let mut best: Option<(NaiveDate, ResolvedValue)> = None;
        for row in self.data_rows() {
            let label = self.label(row);
            let Some(date) = dates::parse_flexible(label) else {
                continue;
            };
            let value = self.cell(row, col);
            if value.is_empty() {
                continue;
            }
            if best.as_ref().map_or(true, |(current, _)| date > *current) {
                best = Some((
                    date,
                    ResolvedValue {
                        value: value.to_string(),
                        period: dates::canonical(date),
                    },
                ));
            }
        }
        best.map(|(_, resolved)| resolved)
            .ok_or_else(|| AssistantError::ValueNotFound(header_label.to_string()))
    }

    /// The data row with the most recent parsed period label, if any.
    pub fn latest_row(&self) -> Option<usize> {
        self.data_rows()
            .filter_map(|row| dates::parse_flexible(self.label(row)).map(|date| (date, row)))
            .max_by_key(|(date, _)| *date)
            .map(|(_, row)| row)
    }
}

fn canonical_label(label: &str) -> String {
    match dates::parse_flexible(label) {
        Some(date) => dates::canonical(date),
        None => label.trim().to_string(),
    }
}
