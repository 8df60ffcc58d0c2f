//! Ticker universe: the selectable (symbol, label) list.
//!
//! Loaded once at startup from a CSV reference list (a `Symbol` column and
//! an optional `Name` or `Security` column used as the label) or from the
//! built-in default. Read-only afterwards.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerInfo {
    pub symbol: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerUniverse {
    tickers: Vec<TickerInfo>,
}

impl TickerUniverse {
    pub fn from_file(path: &Path) -> Result<Self, DashboardError> {
        let file = std::fs::File::open(path)
            .map_err(|e| DashboardError::Config(format!("read universe {}: {e}", path.display())))?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DashboardError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr
            .headers()
            .map_err(|e| DashboardError::Config(format!("universe header: {e}")))?
            .clone();
        let symbol_col = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case("symbol"))
            .ok_or_else(|| DashboardError::Config("universe CSV has no Symbol column".into()))?;
        let label_col = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case("name") || h.eq_ignore_ascii_case("security"));

        let mut tickers: Vec<TickerInfo> = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|e| DashboardError::Config(format!("universe row: {e}")))?;
            let symbol = record.get(symbol_col).unwrap_or("").trim().to_uppercase();
            if symbol.is_empty() || tickers.iter().any(|t| t.symbol == symbol) {
                continue;
            }
            let label = label_col
                .and_then(|c| record.get(c))
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .unwrap_or_else(|| symbol.clone());
            tickers.push(TickerInfo { symbol, label });
        }

        if tickers.is_empty() {
            return Err(DashboardError::Config("universe CSV lists no tickers".into()));
        }
        Ok(Self { tickers })
    }

    /// A small built-in list of large US names, labelled by symbol.
    pub fn default_us() -> Self {
        let symbols = [
            "AAPL", "MSFT", "GOOG", "AMZN", "NVDA", "META", "TSLA", "JPM", "V", "JNJ", "WMT",
            "PG", "XOM", "UNH", "HD", "KO", "PEP", "DIS", "NFLX", "INTC",
        ];
        Self {
            tickers: symbols
                .iter()
                .map(|s| TickerInfo {
                    symbol: s.to_string(),
                    label: s.to_string(),
                })
                .collect(),
        }
    }

    pub fn tickers(&self) -> &[TickerInfo] {
        &self.tickers
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.tickers.iter().map(|t| t.symbol.as_str()).collect()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.tickers.iter().any(|t| t.symbol == symbol)
    }

    pub fn label_for(&self, symbol: &str) -> Option<&str> {
        self.tickers
            .iter()
            .find(|t| t.symbol == symbol)
            .map(|t| t.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}
