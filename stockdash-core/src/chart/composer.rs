//! Builds figures from a price series and the current chart selection.

use tracing::debug;

use super::figure::{
    Figure, FigureLayout, LineMode, LineTrace, OhlcTrace, ScatterTrace, Trace, DECREASING_COLOR,
    INCREASING_COLOR,
};
use super::selection::{ChartKind, OverlaySet};
use crate::domain::PriceSeries;
use crate::indicators::{Indicator, Sma};

/// Base trace for `kind` followed by one line trace per overlay band.
///
/// Short series are drawn as-is; overlays simply show gaps where their
/// lookback is not yet satisfied.
pub fn compose(series: &PriceSeries, kind: ChartKind, overlays: &OverlaySet) -> Figure {
    let mut figure = Figure::new(series.symbol());
    figure.push(base_trace(series, kind));

    for overlay in overlays.iter() {
        for indicator in overlay.indicators() {
            figure.push(overlay_trace(series, indicator.as_ref()));
        }
    }

    debug!(
        ticker = series.symbol(),
        kind = ?kind,
        traces = figure.traces.len(),
        "composed figure"
    );
    figure
}

/// Scatter of the 5-period mean (x) against the 20-period mean (y).
pub fn compose_comparison(series: &PriceSeries) -> Figure {
    let x = Sma::moving_average().series(series).values();
    let y = Sma::ema_slot().series(series).values();

    let mut figure = Figure::new(series.symbol());
    figure.push(Trace::Scatter(ScatterTrace {
        name: "EMA vs SMA".to_string(),
        mode: LineMode::LinesMarkers,
        x,
        y,
        hover_text: series.dates(),
    }));
    figure.layout = FigureLayout {
        x_title: Some("SMA".to_string()),
        y_title: Some("EMA".to_string()),
    };
    debug!(ticker = series.symbol(), "composed comparison figure");
    figure
}

fn base_trace(series: &PriceSeries, kind: ChartKind) -> Trace {
    match kind {
        ChartKind::Candlestick => Trace::Candlestick(OhlcTrace {
            increasing_color: Some(INCREASING_COLOR.to_string()),
            decreasing_color: Some(DECREASING_COLOR.to_string()),
            ..ohlc(series, "candlestick")
        }),
        ChartKind::Ohlc => Trace::Ohlc(ohlc(series, "ohlc")),
        ChartKind::Line => Trace::Line(LineTrace {
            name: "scatter".to_string(),
            mode: LineMode::LinesMarkers,
            x: series.dates(),
            y: series
                .closes()
                .into_iter()
                .map(|c| c.is_finite().then_some(c))
                .collect(),
            show_legend: true,
        }),
    }
}

fn ohlc(series: &PriceSeries, name: &str) -> OhlcTrace {
    let rows = series.rows();
    OhlcTrace {
        name: name.to_string(),
        x: series.dates(),
        open: rows.iter().map(|r| r.open).collect(),
        high: rows.iter().map(|r| r.high).collect(),
        low: rows.iter().map(|r| r.low).collect(),
        close: rows.iter().map(|r| r.close).collect(),
        increasing_color: None,
        decreasing_color: None,
        show_legend: false,
    }
}

fn overlay_trace(series: &PriceSeries, indicator: &dyn Indicator) -> Trace {
    let computed = indicator.series(series);
    Trace::Line(LineTrace {
        name: computed.name.clone(),
        mode: LineMode::Lines,
        x: series.dates(),
        y: computed.values(),
        show_legend: true,
    })
}
