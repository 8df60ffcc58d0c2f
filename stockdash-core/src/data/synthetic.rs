//! Deterministic synthetic price provider for offline use and tests.
//!
//! Each symbol gets its own random walk seeded from BLAKE3(master seed,
//! symbol), so the same symbol always produces the same history regardless of
//! the order symbols are requested in. The walk is anchored at a fixed epoch
//! so a given date has the same row whatever range is requested.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::PriceRow;

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    master_seed: u64,
    missing: HashSet<String>,
}

impl SyntheticProvider {
    pub fn new(master_seed: u64) -> Self {
        Self {
            master_seed,
            missing: HashSet::new(),
        }
    }

    /// Symbols that fetch successfully but with zero rows.
    pub fn with_missing<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing.extend(symbols.into_iter().map(Into::into));
        self
    }

    fn epoch() -> NaiveDate {
        NaiveDate::from_ymd_opt(2000, 1, 3).unwrap_or(NaiveDate::MIN)
    }

    /// Derive the per-symbol seed.
    pub fn symbol_seed(&self, symbol: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }

    fn walk(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<PriceRow> {
        let mut rng = StdRng::seed_from_u64(self.symbol_seed(symbol));
        let mut close: f64 = rng.gen_range(20.0..400.0);
        let mut rows = Vec::new();

        let mut date = Self::epoch();
        while date <= end {
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                let open = close;
                close = (open * (1.0 + rng.gen_range(-0.03..0.0305))).max(0.01);
                let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.015));
                let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.015));
                let volume = rng.gen_range(500_000..8_000_000u64);
                if date >= start {
                    rows.push(PriceRow {
                        date,
                        open,
                        high,
                        low,
                        close,
                        volume,
                    });
                }
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        rows
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<FetchResult, DataError> {
        let rows = if self.missing.contains(symbol) {
            Vec::new()
        } else {
            self.walk(symbol, start, end)
        };
        Ok(FetchResult {
            symbol: symbol.to_string(),
            rows,
            source: DataSource::Synthetic,
        })
    }
}
