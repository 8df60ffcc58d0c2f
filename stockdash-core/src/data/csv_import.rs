//! CSV directory provider: one `<SYMBOL>.csv` per ticker.
//!
//! Expected header: `Date,Open,High,Low,Close,Volume` (extra columns such as
//! `Adj Close` are ignored). Dates are `YYYY-MM-DD`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::PriceRow;

#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    // Some exports write volume as a float.
    #[serde(rename = "Volume")]
    volume: f64,
}

#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol.to_uppercase()))
    }

    fn read_rows(path: &Path) -> Result<Vec<PriceRow>, DataError> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| DataError::CsvError(format!("{}: {e}", path.display())))?;
        reader
            .deserialize::<CsvRecord>()
            .enumerate()
            .map(|(i, rec)| {
                let rec = rec.map_err(|e| {
                    DataError::CsvError(format!("{} record {}: {e}", path.display(), i + 1))
                })?;
                Ok(PriceRow {
                    date: rec.date,
                    open: rec.open,
                    high: rec.high,
                    low: rec.low,
                    close: rec.close,
                    volume: rec.volume.max(0.0).round() as u64,
                })
            })
            .collect()
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<FetchResult, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        let rows = Self::read_rows(&path)?
            .into_iter()
            .filter(|r| r.date >= start && r.date <= end)
            .collect();
        Ok(FetchResult {
            symbol: symbol.to_string(),
            rows,
            source: DataSource::CsvImport,
        })
    }
}
