//! Property tests for indicator and composition invariants.
//!
//! Uses proptest to verify:
//! 1. MA(5) at i >= 4 is the mean of close[i-4..=i]; earlier points undefined
//! 2. Bollinger symmetry: upper - mean == mean - lower == k * std
//! 3. Pivot identity: R1 + S1 == 4PP - H - L
//! 4. VWAP[0] == typical price of row 0
//! 5. Compose is idempotent
//! 6. Toggle parity: N clicks leave an overlay active iff N is odd

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use stockdash_core::chart::{compose, ChartKind, OverlayKind, OverlaySet};
use stockdash_core::domain::{PriceRow, PriceSeries};
use stockdash_core::indicators::rolling::rolling_std;
use stockdash_core::indicators::{
    Bollinger, BollingerBand, Indicator, PivotLevel, PivotPoint, Sma, Vwap, BOLLINGER_NUM_STD,
    BOLLINGER_WINDOW,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_row() -> impl Strategy<Value = (f64, f64, f64, u64)> {
    // (close, upper wick, lower wick, volume)
    (10.0..500.0_f64, 0.0..5.0_f64, 0.0..5.0_f64, 1u64..5_000_000)
}

fn arb_series(min: usize, max: usize) -> impl Strategy<Value = PriceSeries> {
    prop::collection::vec(arb_row(), min..max).prop_map(|raw| {
        let base = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        let rows = raw
            .iter()
            .enumerate()
            .map(|(i, &(close, up, down, volume))| PriceRow {
                date: base + Duration::days(i as i64),
                open: close,
                high: close + up,
                low: close - down,
                close,
                volume,
            })
            .collect();
        PriceSeries::new("PROP", rows).unwrap()
    })
}

fn arb_overlays() -> impl Strategy<Value = OverlaySet> {
    prop::sample::subsequence(OverlayKind::ALL.to_vec(), 0..=5)
        .prop_map(|kinds| kinds.into_iter().collect())
}

fn arb_kind() -> impl Strategy<Value = ChartKind> {
    prop::sample::select(ChartKind::ALL.to_vec())
}

fn close_enough(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    // ── 1. Moving average window ─────────────────────────────────────

    #[test]
    fn moving_average_is_window_mean(series in arb_series(5, 80)) {
        let ma = Sma::moving_average().series(&series);
        let closes = series.closes();
        for i in 0..series.len() {
            match ma.value_at(i) {
                None => prop_assert!(i < 4),
                Some(v) => {
                    prop_assert!(i >= 4);
                    let mean = closes[i - 4..=i].iter().sum::<f64>() / 5.0;
                    prop_assert!(close_enough(v, mean), "i={i} v={v} mean={mean}");
                }
            }
        }
    }

    // ── 2. Bollinger symmetry ────────────────────────────────────────

    #[test]
    fn bollinger_bands_are_symmetric(series in arb_series(1, 80)) {
        let upper = Bollinger::overlay(BollingerBand::Upper).series(&series);
        let mean = Bollinger::overlay(BollingerBand::Mean).series(&series);
        let lower = Bollinger::overlay(BollingerBand::Lower).series(&series);
        let std = rolling_std(&series.closes(), BOLLINGER_WINDOW);

        for i in 0..series.len() {
            if let (Some(u), Some(m), Some(l)) = (upper.value_at(i), mean.value_at(i), lower.value_at(i)) {
                prop_assert!(close_enough(u - m, m - l));
                prop_assert!(close_enough(u - m, BOLLINGER_NUM_STD * std[i]));
            } else {
                prop_assert!(i + 1 < BOLLINGER_WINDOW);
            }
        }
    }

    // ── 3. Pivot identity ────────────────────────────────────────────

    #[test]
    fn pivot_r1_plus_s1(series in arb_series(1, 40)) {
        let pp = PivotPoint::new(PivotLevel::Pp).compute(&series);
        let r1 = PivotPoint::new(PivotLevel::R1).compute(&series);
        let s1 = PivotPoint::new(PivotLevel::S1).compute(&series);
        for (i, row) in series.rows().iter().enumerate() {
            prop_assert!(close_enough(r1[i] + s1[i], 4.0 * pp[i] - row.high - row.low));
        }
    }

    // ── 4. VWAP first row ────────────────────────────────────────────

    #[test]
    fn vwap_starts_at_typical_price(series in arb_series(1, 40)) {
        let vwap = Vwap::default().series(&series);
        let first = series.rows()[0];
        prop_assert!(close_enough(vwap.value_at(0).unwrap(), first.typical_price()));
        prop_assert!(vwap.values().iter().all(Option::is_some));
    }

    // ── 5. Compose idempotence ───────────────────────────────────────

    #[test]
    fn compose_is_idempotent(
        series in arb_series(0, 60),
        kind in arb_kind(),
        overlays in arb_overlays(),
    ) {
        let a = compose(&series, kind, &overlays);
        let b = compose(&series, kind, &overlays);
        prop_assert_eq!(a.trace_names(), b.trace_names());
        prop_assert_eq!(a, b);
    }

    // ── 6. Toggle parity ─────────────────────────────────────────────

    #[test]
    fn toggle_parity(clicks in 0usize..50, idx in 0usize..5) {
        let kind = OverlayKind::ALL[idx];
        let mut set = OverlaySet::new();
        for _ in 0..clicks {
            set.toggle(kind);
        }
        prop_assert_eq!(set.contains(kind), clicks % 2 == 1);
    }
}
