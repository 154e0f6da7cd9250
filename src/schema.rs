//! Descriptors for the four dashboard datasets.
//!
//! Column roles are discovered once when a table is parsed and recorded in a
//! descriptor, so lookups never reach into the sheet by fixed offset and a
//! layout change only requires a descriptor change.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::banks::Bank;
use crate::table::Table;

/// The dataset files backing the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetKind {
    Forecast,
    Valuation,
    Ratio,
    Environmental,
}

impl DatasetKind {
    pub fn all() -> &'static [DatasetKind] {
        &[
            DatasetKind::Forecast,
            DatasetKind::Valuation,
            DatasetKind::Ratio,
            DatasetKind::Environmental,
        ]
    }

    /// File name as published alongside the dashboard.
    pub fn file_name(&self) -> &'static str {
        match self {
            DatasetKind::Forecast => "forcastnew.csv",
            DatasetKind::Valuation => "Valuation.csv",
            DatasetKind::Ratio => "Copy of ratio edited.csv",
            DatasetKind::Environmental => "environmental.csv",
        }
    }
}

/// The column pair carrying one bank's forecast series: dates on the left,
/// prices immediately to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastColumns {
    pub date_col: usize,
    pub price_col: usize,
}

/// Bank → column-role mapping for the price-forecast table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForecastSchema {
    columns: BTreeMap<Bank, ForecastColumns>,
}

impl ForecastSchema {
    /// Scan the header row once: each cell containing a bank's display name
    /// starts that bank's column pair.
    pub fn from_table(table: &Table) -> Self {
        let mut columns = BTreeMap::new();
        if let Some(header) = table.row(0) {
            for (index, cell) in header.iter().enumerate() {
                let lower = cell.to_lowercase();
                for &bank in Bank::all() {
                    if columns.contains_key(&bank) {
                        continue;
                    }
                    if lower.contains(&bank.display_name().to_lowercase()) {
                        columns.insert(
                            bank,
                            ForecastColumns {
                                date_col: index,
                                price_col: index + 1,
                            },
                        );
                    }
                }
            }
        }
        Self { columns }
    }

    pub fn columns_for(&self, bank: Bank) -> Option<ForecastColumns> {
        self.columns.get(&bank).copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Row codes of the environmental (economic-indicator) table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorCode {
    Usd,
    Inflation,
    Interest,
    Gdp,
}

impl IndicatorCode {
    pub fn all() -> &'static [IndicatorCode] {
        &[
            IndicatorCode::Usd,
            IndicatorCode::Inflation,
            IndicatorCode::Interest,
            IndicatorCode::Gdp,
        ]
    }

    /// The code used in the file's first column.
    pub fn code(&self) -> &'static str {
        match self {
            IndicatorCode::Usd => "usd",
            IndicatorCode::Inflation => "inf",
            IndicatorCode::Interest => "int",
            IndicatorCode::Gdp => "gdp",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            IndicatorCode::Usd => "USD/LKR",
            IndicatorCode::Inflation => "Inflation Rate",
            IndicatorCode::Interest => "Interest Rate",
            IndicatorCode::Gdp => "GDP Growth",
        }
    }
}

/// The fifteen ratio columns of a bank's ratio block, in sheet order from
/// ROE through NPL.
pub const RATIO_METRICS: &[&str] = &[
    "ROE",
    "ROA",
    "NIM",
    "Operation efficiency",
    "Temporary investment",
    "Volatile liability dependancy",
    "Burden",
    "Non interest margin",
    "Efficiency",
    "Assets per employee",
    "Net income per employee",
    "Loans per employee",
    "Provision for loan loses",
    "Loan",
    "NPL",
];

/// Metric sub-section headers of a bank's valuation block.
pub const VALUATION_METRICS: &[&str] = &["EPS", "DPS", "P/E", "P/B", "Dividend yield"];

/// Summary column labels of a bank's valuation block.
pub const DECISION_COLUMN: &str = "decision";
pub const STATUS_COLUMN: &str = "status";
pub const INTRINSIC_VALUE_COLUMN: &str = "intrinsic";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_schema_from_header() {
        let table = Table::from_rows(vec![
            vec![
                "HNB".into(),
                "Price".into(),
                "Sampath Bank".into(),
                "Price".into(),
            ],
            vec!["Date".into(), "Price".into(), "Date".into(), "Price".into()],
        ]);
        let schema = ForecastSchema::from_table(&table);
        assert_eq!(schema.len(), 2);
        assert_eq!(
            schema.columns_for(Bank::Hnb),
            Some(ForecastColumns {
                date_col: 0,
                price_col: 1
            })
        );
        assert_eq!(
            schema.columns_for(Bank::Sampath),
            Some(ForecastColumns {
                date_col: 2,
                price_col: 3
            })
        );
        assert_eq!(schema.columns_for(Bank::Seylan), None);
    }

    #[test]
    fn test_forecast_schema_empty_table() {
        let schema = ForecastSchema::from_table(&Table::default());
        assert!(schema.is_empty());
    }

    #[test]
    fn test_indicator_codes() {
        assert_eq!(IndicatorCode::Inflation.code(), "inf");
        assert_eq!(IndicatorCode::all().len(), 4);
    }

    #[test]
    fn test_metric_labels() {
        assert_eq!(RATIO_METRICS.len(), 15);
        assert_eq!(RATIO_METRICS.first(), Some(&"ROE"));
        assert_eq!(RATIO_METRICS.last(), Some(&"NPL"));
        assert_eq!(VALUATION_METRICS.len(), 5);
    }
}
