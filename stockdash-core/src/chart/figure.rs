//! Renderable figure model: a list of traces plus axis titles.
//!
//! Frontends (terminal widgets, JSON output) read this; nothing here knows
//! how to draw.

use chrono::NaiveDate;
use serde::Serialize;

pub const INCREASING_COLOR: &str = "#00ff00";
pub const DECREASING_COLOR: &str = "red";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineMode {
    Lines,
    LinesMarkers,
}

/// Candlestick or OHLC-bar price trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OhlcTrace {
    pub name: String,
    pub x: Vec<NaiveDate>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub increasing_color: Option<String>,
    pub decreasing_color: Option<String>,
    pub show_legend: bool,
}

/// A value series over the date axis. `None` is a gap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineTrace {
    pub name: String,
    pub mode: LineMode,
    pub x: Vec<NaiveDate>,
    pub y: Vec<Option<f64>>,
    pub show_legend: bool,
}

/// Numeric x against numeric y, each point labelled with its date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub name: String,
    pub mode: LineMode,
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
    pub hover_text: Vec<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    Candlestick(OhlcTrace),
    Ohlc(OhlcTrace),
    Line(LineTrace),
    Scatter(ScatterTrace),
}

impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Candlestick(t) | Trace::Ohlc(t) => &t.name,
            Trace::Line(t) => &t.name,
            Trace::Scatter(t) => &t.name,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Trace::Candlestick(t) | Trace::Ohlc(t) => t.x.len(),
            Trace::Line(t) => t.x.len(),
            Trace::Scatter(t) => t.x.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest and largest finite y value, if any.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        let values: Box<dyn Iterator<Item = f64> + '_> = match self {
            Trace::Candlestick(t) | Trace::Ohlc(t) => {
                Box::new(t.low.iter().chain(t.high.iter()).copied())
            }
            Trace::Line(t) => Box::new(t.y.iter().flatten().copied()),
            Trace::Scatter(t) => Box::new(t.y.iter().flatten().copied()),
        };
        fold_bounds(values)
    }
}

pub(crate) fn fold_bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FigureLayout {
    pub x_title: Option<String>,
    pub y_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    pub traces: Vec<Trace>,
    pub layout: FigureLayout,
}

impl Figure {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            traces: Vec::new(),
            layout: FigureLayout::default(),
        }
    }

    pub fn push(&mut self, trace: Trace) {
        self.traces.push(trace);
    }

    pub fn trace_names(&self) -> Vec<&str> {
        self.traces.iter().map(Trace::name).collect()
    }

    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.name() == name)
    }

    /// Combined y range across all traces.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        self.traces
            .iter()
            .filter_map(Trace::y_bounds)
            .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)))
    }

    pub fn is_comparison(&self) -> bool {
        matches!(self.traces.as_slice(), [Trace::Scatter(_)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, y: Vec<Option<f64>>) -> Trace {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        Trace::Line(LineTrace {
            name: name.into(),
            mode: LineMode::Lines,
            x: (0..y.len()).map(|i| base + chrono::Duration::days(i as i64)).collect(),
            y,
            show_legend: true,
        })
    }

    #[test]
    fn bounds_skip_gaps() {
        let t = line("MA", vec![None, Some(3.0), Some(1.0), None]);
        assert_eq!(t.y_bounds(), Some((1.0, 3.0)));
        assert_eq!(line("x", vec![None]).y_bounds(), None);
    }

    #[test]
    fn figure_bounds_union() {
        let mut fig = Figure::new("AAPL");
        fig.push(line("a", vec![Some(2.0), Some(5.0)]));
        fig.push(line("b", vec![Some(-1.0), None]));
        assert_eq!(fig.y_bounds(), Some((-1.0, 5.0)));
        assert_eq!(fig.trace_names(), vec!["a", "b"]);
    }

    #[test]
    fn serializes_with_type_tag() {
        let mut fig = Figure::new("AAPL");
        fig.push(line("MA", vec![None, Some(1.5)]));
        let json = serde_json::to_value(&fig).unwrap();
        assert_eq!(json["traces"][0]["type"], "line");
        assert!(json["traces"][0]["y"][0].is_null());
    }
}
