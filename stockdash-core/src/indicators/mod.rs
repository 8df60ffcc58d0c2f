//! Indicator engine.
//!
//! Indicators are pure functions: price history in, numeric series out. None
//! of them hold state between calls, so they can run concurrently on
//! independent series.
//!
//! Multi-band indicators (Bollinger, pivot points) are exposed as separate
//! named instances per band, keeping the single-series `Indicator` trait
//! unchanged.

pub mod bollinger;
pub mod pivot;
pub mod rolling;
pub mod sma;
pub mod stochastic;
pub mod vwap;

pub use bollinger::{Bollinger, BollingerBand};
pub use pivot::{PivotLevel, PivotPoint};
pub use sma::Sma;
pub use stochastic::Stochastic;
pub use vwap::Vwap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::PriceSeries;

/// Window of the "MA" overlay.
pub const MA_WINDOW: usize = 5;
/// Window of the "EMA" overlay slot. A simple rolling mean, not exponential.
pub const EMA_SLOT_WINDOW: usize = 20;
pub const BOLLINGER_WINDOW: usize = 10;
pub const BOLLINGER_NUM_STD: f64 = 5.0;
pub const VWAP_DAYS: usize = 5;

/// Trait for indicators.
///
/// `compute` returns a `Vec<f64>` of the same length as the input series.
/// Positions without a defined value are `f64::NAN`; `series` turns those
/// into `None` on the date axis.
pub trait Indicator: Send + Sync {
    /// Display name, used as the legend entry (e.g. "MA", "BB_upper").
    fn name(&self) -> &str;

    /// Number of leading rows that are undefined by construction.
    fn lookback(&self) -> usize;

    fn compute(&self, prices: &PriceSeries) -> Vec<f64>;

    /// Compute and align to the series' dates. Non-finite values (warmup,
    /// NaN inputs, degenerate divisions) become undefined.
    fn series(&self, prices: &PriceSeries) -> IndicatorSeries {
        IndicatorSeries::from_values(self.name(), prices, &self.compute(prices))
    }
}

/// A derived series aligned to a price series' date axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    pub name: String,
    pub points: Vec<(NaiveDate, Option<f64>)>,
}

impl IndicatorSeries {
    pub fn from_values(name: impl Into<String>, prices: &PriceSeries, values: &[f64]) -> Self {
        debug_assert_eq!(prices.len(), values.len());
        let points = prices
            .rows()
            .iter()
            .zip(values)
            .map(|(row, &v)| (row.date, v.is_finite().then_some(v)))
            .collect();
        Self {
            name: name.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.points.get(index).and_then(|(_, v)| *v)
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    /// Iterator over the defined values only.
    pub fn defined(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(|(_, v)| *v)
    }

    /// Summary statistics over the defined values.
    pub fn describe(&self) -> SeriesStats {
        SeriesStats::from_values(self.defined())
    }
}

/// Count, mean, sample standard deviation and range of a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesStats {
    pub fn from_values(values: impl Iterator<Item = f64>) -> Self {
        let vals: Vec<f64> = values.collect();
        let count = vals.len();
        if count == 0 {
            return Self {
                count,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                max: f64::NAN,
            };
        }
        let mean = vals.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            (vals.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (count - 1) as f64).sqrt()
        } else {
            f64::NAN
        };
        Self {
            count,
            mean,
            std,
            min: vals.iter().copied().fold(f64::INFINITY, f64::min),
            max: vals.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

#[cfg(test)]
pub use crate::domain::price::series_from_closes;

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
