//! Classic floor-trader pivot points, one level per instance.
//!
//! Computed per row from that row's high/low/close, no window:
//! PP = (H + L + C) / 3, R1 = 2PP - L, S1 = 2PP - H, R2 = PP + H - L,
//! S2 = PP - H + L, R3 = H + 2(PP - L), S3 = L - 2(H - PP).

use super::Indicator;
use crate::domain::{PriceRow, PriceSeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotLevel {
    Pp,
    R1,
    S1,
    R2,
    S2,
    R3,
    S3,
}

impl PivotLevel {
    /// Display order of the overlay traces.
    pub const ALL: [PivotLevel; 7] = [
        PivotLevel::Pp,
        PivotLevel::R1,
        PivotLevel::S1,
        PivotLevel::R2,
        PivotLevel::S2,
        PivotLevel::R3,
        PivotLevel::S3,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PivotLevel::Pp => "Pivot points PP",
            PivotLevel::R1 => "Pivot points R1",
            PivotLevel::S1 => "Pivot points S1",
            PivotLevel::R2 => "Pivot points R2",
            PivotLevel::S2 => "Pivot points S2",
            PivotLevel::R3 => "Pivot points R3",
            PivotLevel::S3 => "Pivot points S3",
        }
    }

    pub fn value(self, row: &PriceRow) -> f64 {
        let (h, l) = (row.high, row.low);
        let pp = row.typical_price();
        match self {
            PivotLevel::Pp => pp,
            PivotLevel::R1 => 2.0 * pp - l,
            PivotLevel::S1 => 2.0 * pp - h,
            PivotLevel::R2 => pp + h - l,
            PivotLevel::S2 => pp - h + l,
            PivotLevel::R3 => h + 2.0 * (pp - l),
            PivotLevel::S3 => l - 2.0 * (h - pp),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PivotPoint {
    level: PivotLevel,
}

impl PivotPoint {
    pub fn new(level: PivotLevel) -> Self {
        Self { level }
    }

    /// All seven levels in display order.
    pub fn all_levels() -> Vec<Self> {
        PivotLevel::ALL.into_iter().map(Self::new).collect()
    }

    pub fn level(&self) -> PivotLevel {
        self.level
    }
}

impl Indicator for PivotPoint {
    fn name(&self) -> &str {
        self.level.label()
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, prices: &PriceSeries) -> Vec<f64> {
        prices.rows().iter().map(|r| self.level.value(r)).collect()
    }
}
