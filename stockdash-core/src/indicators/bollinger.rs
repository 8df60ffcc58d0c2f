//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! Three bands (separate Indicator instances):
//! - Mean: SMA(close, period)
//! - Upper: mean + mult * stddev(close, period)
//! - Lower: mean - mult * stddev(close, period)
//!
//! Uses sample stddev (divide by N - 1).
//! Lookback: period - 1.

use super::rolling::{rolling_mean, rolling_std};
use super::{Indicator, BOLLINGER_NUM_STD, BOLLINGER_WINDOW};
use crate::domain::PriceSeries;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Mean,
    Lower,
}

impl BollingerBand {
    pub const ALL: [BollingerBand; 3] = [BollingerBand::Upper, BollingerBand::Mean, BollingerBand::Lower];

    pub fn label(self) -> &'static str {
        match self {
            BollingerBand::Upper => "BB_upper",
            BollingerBand::Mean => "BB_mean",
            BollingerBand::Lower => "BB_lower",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
}

impl Bollinger {
    pub fn new(band: BollingerBand, period: usize, multiplier: f64) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        Self {
            period,
            multiplier,
            band,
        }
    }

    /// One band with the overlay defaults (10 rows, 5 standard deviations).
    pub fn overlay(band: BollingerBand) -> Self {
        Self::new(band, BOLLINGER_WINDOW, BOLLINGER_NUM_STD)
    }

    /// All three overlay bands in display order: upper, mean, lower.
    pub fn overlay_bands() -> Vec<Self> {
        BollingerBand::ALL.into_iter().map(Self::overlay).collect()
    }

    pub fn band(&self) -> BollingerBand {
        self.band
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        self.band.label()
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, prices: &PriceSeries) -> Vec<f64> {
        let closes = prices.closes();
        let mean = rolling_mean(&closes, self.period);
        if self.band == BollingerBand::Mean {
            return mean;
        }

        let std = rolling_std(&closes, self.period);
        let sign = match self.band {
            BollingerBand::Upper => 1.0,
            _ => -1.0,
        };
        mean.iter()
            .zip(&std)
            .map(|(m, s)| m + sign * self.multiplier * s)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, series_from_closes, DEFAULT_EPSILON};

    #[test]
    fn mean_band_is_sma() {
        let prices = series_from_closes("T", &[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = Bollinger::new(BollingerBand::Mean, 3, 2.0).compute(&prices);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bands_symmetric_around_mean() {
        let prices = series_from_closes("T", &[10.0, 11.5, 12.0, 10.5, 14.0, 13.0]);
        let upper = Bollinger::new(BollingerBand::Upper, 3, 2.0).compute(&prices);
        let mean = Bollinger::new(BollingerBand::Mean, 3, 2.0).compute(&prices);
        let lower = Bollinger::new(BollingerBand::Lower, 3, 2.0).compute(&prices);

        for i in 2..6 {
            assert_approx(upper[i] - mean[i], mean[i] - lower[i], DEFAULT_EPSILON);
        }
    }

    #[test]
    fn width_uses_sample_std() {
        // window [10, 11, 12]: sample std = 1.0
        let prices = series_from_closes("T", &[10.0, 11.0, 12.0]);
        let upper = Bollinger::new(BollingerBand::Upper, 3, 5.0).compute(&prices);
        assert_approx(upper[2], 11.0 + 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn constant_price_collapses_bands() {
        let prices = series_from_closes("T", &[100.0, 100.0, 100.0, 100.0]);
        let upper = Bollinger::new(BollingerBand::Upper, 3, 2.0).compute(&prices);
        let lower = Bollinger::new(BollingerBand::Lower, 3, 2.0).compute(&prices);
        assert_approx(upper[3], 100.0, DEFAULT_EPSILON);
        assert_approx(lower[3], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn overlay_band_names_and_lookback() {
        let names: Vec<&str> = Bollinger::overlay_bands().iter().map(|b| b.band().label()).collect();
        assert_eq!(names, vec!["BB_upper", "BB_mean", "BB_lower"]);
        assert_eq!(Bollinger::overlay(BollingerBand::Upper).lookback(), 9);
    }
}
