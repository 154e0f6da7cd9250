//! The four parsed datasets and the typed queries the chat interpreter and
//! the detail pages run against them.

use std::path::Path;

use chrono::NaiveDate;
use log::info;

use crate::banks::Bank;
use crate::dates;
use crate::error::{AssistantError, Result};
use crate::resolver::{find_entity_block, EntityBlock, PeriodLabel, ResolvedValue};
use crate::schema::{
    DatasetKind, ForecastSchema, IndicatorCode, DECISION_COLUMN, INTRINSIC_VALUE_COLUMN,
    STATUS_COLUMN,
};
use crate::table::Table;

/// Latest summary row of a bank's valuation block. Columns the sheet does
/// not carry come back as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuationSummary {
    pub decision: Option<String>,
    pub status: Option<String>,
    pub intrinsic_value: Option<String>,
    pub as_of: String,
}

/// All four datasets, parsed once and read-only thereafter.
#[derive(Debug, Clone)]
pub struct DataStore {
    forecast: Table,
    forecast_schema: ForecastSchema,
    valuation: Table,
    ratio: Table,
    environmental: Table,
}

impl DataStore {
    pub fn from_tables(forecast: Table, valuation: Table, ratio: Table, environmental: Table) -> Self {
        let forecast_schema = ForecastSchema::from_table(&forecast);
        info!(
            "datasets loaded: forecast {} rows ({} banks mapped), valuation {} rows, ratio {} rows, environmental {} rows",
            forecast.len(),
            forecast_schema.len(),
            valuation.len(),
            ratio.len(),
            environmental.len()
        );
        Self {
            forecast,
            forecast_schema,
            valuation,
            ratio,
            environmental,
        }
    }

    /// Load the four dataset files by their published names from `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let read = |kind: DatasetKind| Table::from_path(&dir.join(kind.file_name()));
        Ok(Self::from_tables(
            read(DatasetKind::Forecast)?,
            read(DatasetKind::Valuation)?,
            read(DatasetKind::Ratio)?,
            read(DatasetKind::Environmental)?,
        ))
    }

    pub fn forecast_schema(&self) -> &ForecastSchema {
        &self.forecast_schema
    }

    // --- forecast table ---------------------------------------------------

    /// Closing price of `bank` on an exact date.
    pub fn price_on(&self, bank: Bank, date: NaiveDate) -> Result<ResolvedValue> {
        let cols = self
            .forecast_schema
            .columns_for(bank)
            .ok_or_else(|| AssistantError::EntityNotFound(bank.to_string()))?;
        let wanted = dates::canonical(date);

        // rows 0 and 1 are the bank header and the Date/Price sub-header
        for row in 2..self.forecast.len() {
            let label = self.forecast.cell(row, cols.date_col);
            if label.trim().is_empty() {
                continue;
            }
            let matches = match dates::parse_flexible(label) {
                Some(parsed) => parsed == date,
                None => strip_whitespace(&dates::normalize_date(label)) == strip_whitespace(&wanted),
            };
            if matches {
                let price = self.forecast.cell(row, cols.price_col);
                if !price.is_empty() {
                    return Ok(ResolvedValue {
                        value: price.to_string(),
                        period: wanted,
                    });
                }
            }
        }
        Err(AssistantError::ValueNotFound(format!("{bank} price")))
    }

    /// Most recent forecast price of `bank`, by parsed date.
    pub fn latest_price(&self, bank: Bank) -> Result<ResolvedValue> {
        let cols = self
            .forecast_schema
            .columns_for(bank)
            .ok_or_else(|| AssistantError::EntityNotFound(bank.to_string()))?;

        let mut best: Option<(NaiveDate, ResolvedValue)> = None;
        for row in 2..self.forecast.len() {
            let Some(date) = dates::parse_flexible(self.forecast.cell(row, cols.date_col)) else {
                continue;
            };
            let price = self.forecast.cell(row, cols.price_col);
            if price.is_empty() {
                continue;
            }
            if best.as_ref().map_or(true, |(current, _)| date > *current) {
                best = Some((
                    date,
                    ResolvedValue {
                        value: price.to_string(),
                        period: dates::canonical(date),
                    },
                ));
            }
        }
        best.map(|(_, resolved)| resolved)
            .ok_or_else(|| AssistantError::ValueNotFound(format!("{bank} price")))
    }

    // --- valuation table --------------------------------------------------

    fn valuation_block(&self, bank: Bank) -> Result<EntityBlock<'_>> {
        find_entity_block(&self.valuation, bank.display_name(), PeriodLabel::Date)
    }

    /// The recorded buy/sell/hold decision for `bank` on an exact date.
    pub fn decision_on(&self, bank: Bank, date: NaiveDate) -> Result<ResolvedValue> {
        self.valuation_block(bank)?.value_on_date(DECISION_COLUMN, date)
    }

    /// The most recent recorded decision for `bank`.
    pub fn latest_decision(&self, bank: Bank) -> Result<ResolvedValue> {
        self.valuation_block(bank)?.latest_in_column(DECISION_COLUMN)
    }

    /// A metric cell (EPS, DPS, P/E, ...) from `bank`'s valuation block on
    /// an exact date.
    pub fn valuation_metric_on(&self, bank: Bank, label: &str, date: NaiveDate) -> Result<ResolvedValue> {
        self.valuation_block(bank)?.value_on_date(label, date)
    }

    /// Decision/status/intrinsic-value summary from the most recent row of
    /// `bank`'s valuation block.
    pub fn valuation_summary(&self, bank: Bank) -> Result<ValuationSummary> {
        let block = self.valuation_block(bank)?;
        let row = block
            .latest_row()
            .ok_or_else(|| AssistantError::ValueNotFound(format!("{bank} valuation")))?;

        let read = |label: &str| {
            block.column(label).ok().and_then(|col| {
                let value = block.cell(row, col).trim();
                (!value.is_empty()).then(|| value.to_string())
            })
        };

        Ok(ValuationSummary {
            decision: read(DECISION_COLUMN),
            status: read(STATUS_COLUMN),
            intrinsic_value: read(INTRINSIC_VALUE_COLUMN),
            as_of: canonicalized(block.label(row)),
        })
    }

    // --- ratio table ------------------------------------------------------

    /// Year-by-year values of one named ratio for `bank`. Cells that do not
    /// hold a number (`N/A`, `NaN`, blanks) come back as `None`.
    pub fn ratio_series(&self, bank: Bank, metric: &str) -> Result<Vec<(String, Option<f64>)>> {
        let block = find_entity_block(&self.ratio, bank.display_name(), PeriodLabel::Year)?;
        let col = block.column(metric)?;
        Ok(block
            .data_rows()
            .map(|row| {
                (
                    block.label(row).trim().to_string(),
                    parse_number(block.cell(row, col)),
                )
            })
            .collect())
    }

    // --- environmental table ----------------------------------------------

    fn indicator_row(&self, code: IndicatorCode) -> Result<usize> {
        (1..self.environmental.len())
            .find(|&row| self.environmental.cell(row, 0).trim() == code.code())
            .ok_or_else(|| AssistantError::EntityNotFound(code.code().to_string()))
    }

    /// Month-by-month series of one economic indicator. Month labels come
    /// from the header row; unparseable cells come back as `None`.
    pub fn indicator_series(&self, code: IndicatorCode) -> Result<Vec<(String, Option<f64>)>> {
        let row = self.indicator_row(code)?;
        let header = self
            .environmental
            .row(0)
            .ok_or_else(|| AssistantError::EntityNotFound(code.code().to_string()))?;

        Ok(header
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, month)| !month.trim().is_empty())
            .map(|(col, month)| {
                (
                    month.trim().to_string(),
                    parse_number(self.environmental.cell(row, col)),
                )
            })
            .collect())
    }

    /// One indicator's value for an exact month label.
    pub fn indicator_on(&self, code: IndicatorCode, month: &str) -> Result<f64> {
        self.indicator_series(code)?
            .into_iter()
            .find(|(label, _)| label == month.trim())
            .and_then(|(_, value)| value)
            .ok_or_else(|| AssistantError::ValueNotFound(code.code().to_string()))
    }

    /// The last populated value of an indicator series.
    pub fn latest_indicator(&self, code: IndicatorCode) -> Result<(String, f64)> {
        self.indicator_series(code)?
            .into_iter()
            .rev()
            .find_map(|(label, value)| value.map(|v| (label, v)))
            .ok_or_else(|| AssistantError::ValueNotFound(code.code().to_string()))
    }
}

/// Numeric cell cleaning: thousands separators stripped, `N/A`/`NaN`/blank
/// read as missing.
fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() || trimmed == "N/A" || trimmed == "NaN" {
        return None;
    }
    trimmed.replace(',', "").parse().ok()
}

fn canonicalized(label: &str) -> String {
    match dates::parse_flexible(label) {
        Some(date) => dates::canonical(date),
        None => label.trim().to_string(),
    }
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forecast_fixture() -> Table {
        Table::from_rows(vec![
            vec!["HNB".into(), "".into(), "Sampath".into(), "".into()],
            vec!["Date".into(), "Price".into(), "Date".into(), "Price".into()],
            vec![
                "1/2/2025".into(),
                "155.00".into(),
                "1/2/2025".into(),
                "98.75".into(),
            ],
            vec!["1/9/2025".into(), "156.20".into(), "".into(), "".into()],
        ])
    }

    fn valuation_fixture() -> Table {
        Table::from_rows(vec![
            vec!["HNB".into()],
            vec![
                "Date".into(),
                "EPS".into(),
                "Decision".into(),
                "Status".into(),
                "Intrinsic value".into(),
            ],
            vec![
                "1/2/2025".into(),
                "32.1".into(),
                "Buy".into(),
                "Undervalued".into(),
                "171.40".into(),
            ],
            vec![
                "1/9/2025".into(),
                "32.8".into(),
                "Hold".into(),
                "Fair".into(),
                "158.90".into(),
            ],
        ])
    }

    fn ratio_fixture() -> Table {
        Table::from_rows(vec![
            vec!["Sampath".into()],
            vec!["Year".into(), "ROE".into(), "NPL".into()],
            vec!["2022".into(), "12.4".into(), "N/A".into()],
            vec!["2023".into(), "1,300.5".into(), "3.2".into()],
        ])
    }

    fn environmental_fixture() -> Table {
        Table::from_rows(vec![
            vec!["".into(), "2023-05".into(), "2023-06".into(), "2023-07".into()],
            vec!["usd".into(), "305.1".into(), "299.83".into(), "".into()],
            vec!["inf".into(), "5.1".into(), "4.6".into(), "x".into()],
        ])
    }

    fn store() -> DataStore {
        DataStore::from_tables(
            forecast_fixture(),
            valuation_fixture(),
            ratio_fixture(),
            environmental_fixture(),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_price_on_exact_date() {
        let resolved = store().price_on(Bank::Hnb, date(2025, 1, 9)).unwrap();
        assert_eq!(resolved.value, "156.20");
        assert_eq!(resolved.period, "1/9/2025");
    }

    #[test]
    fn test_price_on_missing_date() {
        let err = store().price_on(Bank::Hnb, date(2025, 2, 1)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_price_for_unmapped_bank() {
        let err = store().price_on(Bank::Ntb, date(2025, 1, 2)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_latest_price() {
        let resolved = store().latest_price(Bank::Hnb).unwrap();
        assert_eq!(resolved.value, "156.20");
        assert_eq!(resolved.period, "1/9/2025");
    }

    #[test]
    fn test_decision_lookups() {
        let store = store();
        let exact = store.decision_on(Bank::Hnb, date(2025, 1, 2)).unwrap();
        assert_eq!(exact.value, "Buy");

        let latest = store.latest_decision(Bank::Hnb).unwrap();
        assert_eq!(latest.value, "Hold");
        assert_eq!(latest.period, "1/9/2025");
    }

    #[test]
    fn test_valuation_metric_on() {
        let resolved = store()
            .valuation_metric_on(Bank::Hnb, "EPS", date(2025, 1, 9))
            .unwrap();
        assert_eq!(resolved.value, "32.8");
    }

    #[test]
    fn test_valuation_summary() {
        let summary = store().valuation_summary(Bank::Hnb).unwrap();
        assert_eq!(summary.decision.as_deref(), Some("Hold"));
        assert_eq!(summary.status.as_deref(), Some("Fair"));
        assert_eq!(summary.intrinsic_value.as_deref(), Some("158.90"));
        assert_eq!(summary.as_of, "1/9/2025");
    }

    #[test]
    fn test_ratio_series_cleans_numbers() {
        let series = store().ratio_series(Bank::Sampath, "ROE").unwrap();
        assert_eq!(
            series,
            vec![
                ("2022".to_string(), Some(12.4)),
                ("2023".to_string(), Some(1300.5)),
            ]
        );

        let npl = store().ratio_series(Bank::Sampath, "NPL").unwrap();
        assert_eq!(npl[0], ("2022".to_string(), None));
    }

    #[test]
    fn test_indicator_series_and_lookup() {
        let store = store();
        let usd = store.indicator_series(IndicatorCode::Usd).unwrap();
        assert_eq!(usd.len(), 3);
        assert_eq!(usd[1], ("2023-06".to_string(), Some(299.83)));

        assert_eq!(store.indicator_on(IndicatorCode::Inflation, "2023-06").unwrap(), 4.6);
        assert!(store
            .indicator_on(IndicatorCode::Inflation, "2023-07")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_latest_indicator_skips_gaps() {
        let (month, value) = store().latest_indicator(IndicatorCode::Usd).unwrap();
        assert_eq!(month, "2023-06");
        assert_eq!(value, 299.83);

        let err = store().indicator_series(IndicatorCode::Gdp).unwrap_err();
        assert!(err.is_not_found());
    }
}
