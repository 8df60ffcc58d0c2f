//! Volume Weighted Average Price over a trailing window of days.
//!
//! VWAP[i] = sum(TP * V) / sum(V) over the last `days` rows, with
//! `min_periods = 1`: the first row is already defined. A window with zero
//! total volume is undefined.

use super::rolling::rolling_sum_min1;
use super::{Indicator, VWAP_DAYS};
use crate::domain::PriceSeries;

#[derive(Debug, Clone)]
pub struct Vwap {
    days: usize,
}

impl Vwap {
    pub fn new(days: usize) -> Self {
        assert!(days >= 1, "VWAP days must be >= 1");
        Self { days }
    }
}

impl Default for Vwap {
    fn default() -> Self {
        Self::new(VWAP_DAYS)
    }
}

impl Indicator for Vwap {
    fn name(&self) -> &str {
        "VWAP"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, prices: &PriceSeries) -> Vec<f64> {
        let pv: Vec<f64> = prices
            .rows()
            .iter()
            .map(|r| r.typical_price() * r.volume as f64)
            .collect();
        let vol: Vec<f64> = prices.rows().iter().map(|r| r.volume as f64).collect();

        let total_pv = rolling_sum_min1(&pv, self.days);
        let total_vol = rolling_sum_min1(&vol, self.days);
        total_pv
            .iter()
            .zip(&total_vol)
            .map(|(&p, &v)| if v > 0.0 { p / v } else { f64::NAN })
            .collect()
    }
}
