//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a lookback window.
//! Lookback: period - 1 (first valid value at index period-1).
//!
//! Both the "MA" overlay (5 rows) and the "EMA" overlay slot (20 rows) are
//! instances of this indicator. The EMA slot is intentionally a simple mean.

use super::rolling::rolling_mean;
use super::{Indicator, EMA_SLOT_WINDOW, MA_WINDOW};
use crate::domain::PriceSeries;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize, name: impl Into<String>) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: name.into(),
        }
    }

    /// The "MA" overlay: 5-row mean of close.
    pub fn moving_average() -> Self {
        Self::new(MA_WINDOW, "MA")
    }

    /// The "EMA" overlay slot: 20-row simple mean of close.
    pub fn ema_slot() -> Self {
        Self::new(EMA_SLOT_WINDOW, "EMA")
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, prices: &PriceSeries) -> Vec<f64> {
        rolling_mean(&prices.closes(), self.period)
    }
}
