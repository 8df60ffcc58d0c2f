//! Threshold rules for the fixed-symbol rule panel.
//!
//! A [`RuleBook`] holds one set of bounds per metric. Frontends hand it a
//! typed [`RuleInput`] on "update rules" and read back a [`RuleTable`] on
//! "view current rules". Nothing is persisted.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::domain::PriceSeries;
use crate::indicators::{Bollinger, BollingerBand, Indicator, SeriesStats, Sma};

pub const TABLE_COLUMNS: [&str; 2] = ["Indicator", "Current Rules"];

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RuleError {
    #[error("Please select an indicator first")]
    NoMetricSelected,

    #[error("{field} must be a finite number, got {value}")]
    InvalidBound { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleMetric {
    BollingerBand,
    MovingAverage,
}

impl RuleMetric {
    pub const ALL: [RuleMetric; 2] = [RuleMetric::BollingerBand, RuleMetric::MovingAverage];

    pub fn label(self) -> &'static str {
        match self {
            RuleMetric::BollingerBand => "Bollinger band",
            RuleMetric::MovingAverage => "Moving average",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bollinger" | "bollinger band" | "bb" => Some(RuleMetric::BollingerBand),
            "ma" | "moving average" | "moving_average" => Some(RuleMetric::MovingAverage),
            _ => None,
        }
    }

    pub fn has_mean_bound(self) -> bool {
        matches!(self, RuleMetric::BollingerBand)
    }

    /// Row labels, top to bottom.
    pub fn row_labels(self) -> &'static [&'static str] {
        match self {
            RuleMetric::BollingerBand => &["Upper band limit", "mean band limit", "lower band limit"],
            RuleMetric::MovingAverage => &["Upper limit", "Lower limit"],
        }
    }
}

/// Values typed into the setter panel. `mean` is ignored for metrics
/// without a mean bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleInput {
    pub upper: f64,
    pub mean: f64,
    pub lower: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RuleBounds {
    pub upper: f64,
    pub mean: Option<f64>,
    pub lower: f64,
}

impl RuleBounds {
    fn zeroed(metric: RuleMetric) -> Self {
        Self {
            upper: 0.0,
            mean: metric.has_mean_bound().then_some(0.0),
            lower: 0.0,
        }
    }

    fn values(&self) -> Vec<f64> {
        let mut out = vec![self.upper];
        out.extend(self.mean);
        out.push(self.lower);
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleTable {
    pub metric: RuleMetric,
    pub columns: [&'static str; 2],
    pub rows: Vec<(&'static str, f64)>,
}

#[derive(Debug, Clone)]
pub struct RuleBook {
    symbol: String,
    start: NaiveDate,
    end: NaiveDate,
    bounds: HashMap<RuleMetric, RuleBounds>,
}

impl RuleBook {
    pub fn new(symbol: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            start,
            end,
            bounds: RuleMetric::ALL
                .into_iter()
                .map(|m| (m, RuleBounds::zeroed(m)))
                .collect(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    pub fn bounds(&self, metric: RuleMetric) -> RuleBounds {
        self.bounds
            .get(&metric)
            .copied()
            .unwrap_or_else(|| RuleBounds::zeroed(metric))
    }

    /// Store the entered bounds for `metric`.
    pub fn commit(&mut self, metric: RuleMetric, input: RuleInput) -> Result<(), RuleError> {
        check_finite("upper", input.upper)?;
        check_finite("lower", input.lower)?;
        if metric.has_mean_bound() {
            check_finite("mean", input.mean)?;
        }
        let bounds = RuleBounds {
            upper: input.upper,
            mean: metric.has_mean_bound().then_some(input.mean),
            lower: input.lower,
        };
        info!(metric = metric.label(), ?bounds, "rules updated");
        self.bounds.insert(metric, bounds);
        Ok(())
    }

    pub fn view(&self, metric: Option<RuleMetric>) -> Result<RuleTable, RuleError> {
        let metric = metric.ok_or(RuleError::NoMetricSelected)?;
        let rows = metric
            .row_labels()
            .iter()
            .copied()
            .zip(self.bounds(metric).values())
            .collect();
        Ok(RuleTable {
            metric,
            columns: TABLE_COLUMNS,
            rows,
        })
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), RuleError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RuleError::InvalidBound { field, value })
    }
}

/// "Current value" column shown next to each bound input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSnapshot {
    pub metric: RuleMetric,
    pub rows: Vec<(&'static str, f64)>,
}

impl MetricSnapshot {
    /// Bollinger: mean of each band. Moving average: mean plus and minus one
    /// sample standard deviation of the 5-period mean.
    pub fn compute(metric: RuleMetric, series: &PriceSeries) -> Self {
        let values = match metric {
            RuleMetric::BollingerBand => BollingerBand::ALL
                .into_iter()
                .map(|band| Bollinger::overlay(band).series(series).describe().mean)
                .collect(),
            RuleMetric::MovingAverage => {
                let SeriesStats { mean, std, .. } =
                    Sma::moving_average().series(series).describe();
                vec![mean + std, mean - std]
            }
        };
        Self {
            metric,
            rows: metric.row_labels().iter().copied().zip(values).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, series_from_closes, DEFAULT_EPSILON};

    fn book() -> RuleBook {
        RuleBook::new(
            "AAPL",
            NaiveDate::from_ymd_opt(2019, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 4, 20).unwrap(),
        )
    }

    #[test]
    fn view_without_metric_alerts() {
        let err = book().view(None).unwrap_err();
        assert_eq!(err, RuleError::NoMetricSelected);
        assert_eq!(err.to_string(), "Please select an indicator first");
    }

    #[test]
    fn defaults_are_zero() {
        let table = book().view(Some(RuleMetric::BollingerBand)).unwrap();
        assert_eq!(table.columns, ["Indicator", "Current Rules"]);
        assert_eq!(
            table.rows,
            vec![
                ("Upper band limit", 0.0),
                ("mean band limit", 0.0),
                ("lower band limit", 0.0)
            ]
        );
    }

    #[test]
    fn commit_then_view_bollinger() {
        let mut b = book();
        b.commit(
            RuleMetric::BollingerBand,
            RuleInput {
                upper: 300.0,
                mean: 250.0,
                lower: 200.0,
            },
        )
        .unwrap();
        let table = b.view(Some(RuleMetric::BollingerBand)).unwrap();
        let values: Vec<f64> = table.rows.iter().map(|r| r.1).collect();
        assert_eq!(values, vec![300.0, 250.0, 200.0]);
    }

    #[test]
    fn moving_average_ignores_mean_input() {
        let mut b = book();
        b.commit(
            RuleMetric::MovingAverage,
            RuleInput {
                upper: 10.0,
                mean: f64::NAN,
                lower: 5.0,
            },
        )
        .unwrap();
        let table = b.view(Some(RuleMetric::MovingAverage)).unwrap();
        assert_eq!(table.rows, vec![("Upper limit", 10.0), ("Lower limit", 5.0)]);
        // other metric untouched
        assert_eq!(b.bounds(RuleMetric::BollingerBand).upper, 0.0);
    }

    #[test]
    fn non_finite_bound_rejected() {
        let mut b = book();
        let err = b
            .commit(
                RuleMetric::BollingerBand,
                RuleInput {
                    upper: f64::INFINITY,
                    ..RuleInput::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, RuleError::InvalidBound { field: "upper", .. }));
    }

    #[test]
    fn snapshot_moving_average() {
        // MA(5) over 1..=7 is [3, 4, 5]: mean 4, sample std 1
        let series = series_from_closes("AAPL", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let snap = MetricSnapshot::compute(RuleMetric::MovingAverage, &series);
        assert_eq!(snap.rows[0].0, "Upper limit");
        assert_approx(snap.rows[0].1, 5.0, DEFAULT_EPSILON);
        assert_approx(snap.rows[1].1, 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn snapshot_bollinger_is_symmetric() {
        let closes: Vec<f64> = (0..40).map(|i| 50.0 + (i as f64 * 0.3).cos() * 4.0).collect();
        let series = series_from_closes("AAPL", &closes);
        let snap = MetricSnapshot::compute(RuleMetric::BollingerBand, &series);
        let (u, m, l) = (snap.rows[0].1, snap.rows[1].1, snap.rows[2].1);
        assert_approx(u - m, m - l, 1e-9);
    }

    #[test]
    fn parse_metric() {
        assert_eq!(RuleMetric::parse("Bollinger"), Some(RuleMetric::BollingerBand));
        assert_eq!(RuleMetric::parse("MA"), Some(RuleMetric::MovingAverage));
        assert_eq!(RuleMetric::parse("rsi"), None);
    }
}
