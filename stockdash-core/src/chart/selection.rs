//! Chart kind and overlay selection types.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::indicators::{Bollinger, Indicator, PivotPoint, Sma, Vwap};

/// Base trace style. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Candlestick,
    Line,
    Ohlc,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Candlestick, ChartKind::Line, ChartKind::Ohlc];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Candlestick => "Candlestick graph",
            ChartKind::Line => "line graph",
            ChartKind::Ohlc => "OHLC graph",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "candlestick" | "candle" => Some(ChartKind::Candlestick),
            "line" | "scatter" => Some(ChartKind::Line),
            "ohlc" => Some(ChartKind::Ohlc),
            _ => None,
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Indicator overlays that can be drawn over the base trace.
///
/// Variant order is the order traces are appended to a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    MovingAverage,
    BollingerBands,
    ExponentialMovingAverage,
    PivotPoints,
    VolumeWeightedAveragePrice,
}

impl OverlayKind {
    pub const ALL: [OverlayKind; 5] = [
        OverlayKind::MovingAverage,
        OverlayKind::BollingerBands,
        OverlayKind::ExponentialMovingAverage,
        OverlayKind::PivotPoints,
        OverlayKind::VolumeWeightedAveragePrice,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OverlayKind::MovingAverage => "Moving Average",
            OverlayKind::BollingerBands => "Bollinger Band",
            OverlayKind::ExponentialMovingAverage => "Exponential Moving Average",
            OverlayKind::PivotPoints => "Pivot Points",
            OverlayKind::VolumeWeightedAveragePrice => "Volume Weighted Average Price",
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            OverlayKind::MovingAverage => "MA",
            OverlayKind::BollingerBands => "BB",
            OverlayKind::ExponentialMovingAverage => "EMA",
            OverlayKind::PivotPoints => "PP",
            OverlayKind::VolumeWeightedAveragePrice => "VWAP",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ma" | "sma" | "moving_average" => Some(OverlayKind::MovingAverage),
            "bb" | "bollinger" => Some(OverlayKind::BollingerBands),
            "ema" => Some(OverlayKind::ExponentialMovingAverage),
            "pp" | "pivot" | "pivots" => Some(OverlayKind::PivotPoints),
            "vwap" => Some(OverlayKind::VolumeWeightedAveragePrice),
            _ => None,
        }
    }

    /// The indicator instances drawn for this overlay, one per trace.
    pub fn indicators(self) -> Vec<Box<dyn Indicator>> {
        match self {
            OverlayKind::MovingAverage => vec![Box::new(Sma::moving_average())],
            OverlayKind::ExponentialMovingAverage => vec![Box::new(Sma::ema_slot())],
            OverlayKind::BollingerBands => Bollinger::overlay_bands()
                .into_iter()
                .map(|b| Box::new(b) as Box<dyn Indicator>)
                .collect(),
            OverlayKind::PivotPoints => PivotPoint::all_levels()
                .into_iter()
                .map(|p| Box::new(p) as Box<dyn Indicator>)
                .collect(),
            OverlayKind::VolumeWeightedAveragePrice => vec![Box::new(Vwap::default())],
        }
    }
}

/// Set of active overlays. Each toggle flips membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlaySet {
    active: BTreeSet<OverlayKind>,
}

impl OverlaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership; returns whether the overlay is now active.
    pub fn toggle(&mut self, kind: OverlayKind) -> bool {
        if self.active.remove(&kind) {
            false
        } else {
            self.active.insert(kind);
            true
        }
    }

    pub fn contains(&self, kind: OverlayKind) -> bool {
        self.active.contains(&kind)
    }

    /// Active overlays in append order.
    pub fn iter(&self) -> impl Iterator<Item = OverlayKind> + '_ {
        self.active.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl FromIterator<OverlayKind> for OverlaySet {
    fn from_iter<I: IntoIterator<Item = OverlayKind>>(iter: I) -> Self {
        Self {
            active: iter.into_iter().collect(),
        }
    }
}
