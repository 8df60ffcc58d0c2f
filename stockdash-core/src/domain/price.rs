//! Price rows and the per-ticker price series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One trading day of OHLCV data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceRow {
    /// Typical price: (high + low + close) / 3.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Returns true if any price field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic sanity: high bounds the body from above, low from below.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open.max(self.close)
            && self.low <= self.open.min(self.close)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("dates not strictly increasing at row {index}: {prev} then {next}")]
    Unordered {
        index: usize,
        prev: NaiveDate,
        next: NaiveDate,
    },
}

/// Date-ordered OHLCV table for a single ticker.
///
/// Dates are strictly increasing. Gaps (weekends, holidays) are expected.
/// A series is never mutated after construction; a new fetch builds a new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    rows: Vec<PriceRow>,
}

impl PriceSeries {
    /// Build a series, rejecting rows that are not strictly ascending by date.
    pub fn new(symbol: impl Into<String>, rows: Vec<PriceRow>) -> Result<Self, SeriesError> {
        for (i, pair) in rows.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::Unordered {
                    index: i + 1,
                    prev: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            rows,
        })
    }

    /// Build a series from rows in any order. Sorts ascending and keeps the
    /// last row seen for a duplicated date.
    pub fn from_unordered(symbol: impl Into<String>, mut rows: Vec<PriceRow>) -> Self {
        rows.sort_by_key(|r| r.date);
        let mut deduped: Vec<PriceRow> = Vec::with_capacity(rows.len());
        for row in rows {
            match deduped.last_mut() {
                Some(last) if last.date == row.date => *last = row,
                _ => deduped.push(row),
            }
        }
        Self {
            symbol: symbol.into(),
            rows: deduped,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.close).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }
}

/// Build a synthetic series from close prices for tests.
///
/// open = previous close (or close for the first row), high/low = body ± 1.0,
/// volume = 1000, one calendar day apart starting 2024-01-02.
#[cfg(test)]
pub fn series_from_closes(symbol: &str, closes: &[f64]) -> PriceSeries {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let rows = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceRow {
                date: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect();
    PriceSeries::new(symbol, rows).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(y: i32, m: u32, d: u32, close: f64) -> PriceRow {
        PriceRow {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 10,
        }
    }

    #[test]
    fn rejects_unordered_dates() {
        let rows = vec![row(2024, 1, 3, 1.0), row(2024, 1, 2, 2.0)];
        let err = PriceSeries::new("AAPL", rows).unwrap_err();
        assert!(matches!(err, SeriesError::Unordered { index: 1, .. }));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let rows = vec![row(2024, 1, 2, 1.0), row(2024, 1, 2, 2.0)];
        assert!(PriceSeries::new("AAPL", rows).is_err());
    }

    #[test]
    fn from_unordered_sorts_and_dedups() {
        let rows = vec![
            row(2024, 1, 4, 3.0),
            row(2024, 1, 2, 1.0),
            row(2024, 1, 4, 4.0),
            row(2024, 1, 3, 2.0),
        ];
        let series = PriceSeries::from_unordered("AAPL", rows);
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![1.0, 2.0, 4.0]);
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[test]
    fn typical_price_is_hlc_mean() {
        let r = PriceRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 10.0,
            high: 12.0,
            low: 9.0,
            close: 11.0,
            volume: 5,
        };
        assert!((r.typical_price() - 32.0 / 3.0).abs() < 1e-12);
        assert!(r.is_sane());
    }

    #[test]
    fn insane_when_high_below_low() {
        let mut r = row(2024, 1, 2, 10.0);
        r.high = 8.0;
        assert!(!r.is_sane());
    }
}
