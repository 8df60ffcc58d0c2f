//! Stochastic oscillator %K, single row: (close - low) / (high - low).
//!
//! A row with high == low has no range; the division is left to produce a
//! non-finite value, which `series` reports as undefined.

use super::Indicator;
use crate::domain::PriceSeries;

#[derive(Debug, Clone, Default)]
pub struct Stochastic;

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        "Stochastic oscillator"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, prices: &PriceSeries) -> Vec<f64> {
        prices
            .rows()
            .iter()
            .map(|r| (r.close - r.low) / (r.high - r.low))
            .collect()
    }
}
