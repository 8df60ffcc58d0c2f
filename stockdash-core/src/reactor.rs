//! Selection-state reactor.
//!
//! Owns the dashboard's [`SelectionState`] and turns each UI event into a
//! [`Render`]. Events are handled one at a time through `&mut self`; the
//! only parallelism is the per-ticker fetch inside a single event.

use std::collections::HashMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::chart::{compose, compose_comparison, ChartKind, Figure, OverlayKind, OverlaySet};
use crate::domain::{PriceSeries, Symbol};
use crate::error::DashboardError;
use crate::window::{TimeWindow, WindowPreset, WindowResolver};

pub const NO_TICKER_PROMPT: &str = "Select a stock ticker.";

/// Discrete UI events.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Replace the selected tickers.
    TickersChanged(Vec<Symbol>),
    TimeButton(WindowPreset),
    CustomRange { start: NaiveDate, end: NaiveDate },
    ChartButton(ChartKind),
    OverlayButton(OverlayKind),
    /// Show the EMA-vs-SMA comparison for this event only.
    EmaSmaButton,
    /// Drop cached series and refetch everything.
    Refresh,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionState {
    pub tickers: Vec<Symbol>,
    pub window: TimeWindow,
    pub kind: ChartKind,
    pub overlays: OverlaySet,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerChart {
    pub ticker: Symbol,
    #[serde(serialize_with = "serialize_outcome")]
    pub outcome: Result<Figure, DashboardError>,
}

fn serialize_outcome<S: serde::Serializer>(
    outcome: &Result<Figure, DashboardError>,
    s: S,
) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    #[serde(rename_all = "snake_case")]
    enum Outcome<'a> {
        Figure(&'a Figure),
        Error(String),
    }
    match outcome {
        Ok(fig) => Outcome::Figure(fig).serialize(s),
        Err(e) => Outcome::Error(e.to_string()).serialize(s),
    }
}

/// What the frontend should draw after an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Render {
    Prompt(String),
    Charts(Vec<TickerChart>),
}

impl Render {
    pub fn charts(&self) -> &[TickerChart] {
        match self {
            Render::Charts(c) => c,
            Render::Prompt(_) => &[],
        }
    }
}

pub struct Reactor {
    state: SelectionState,
    resolver: WindowResolver,
    /// Series loaded for the current window, keyed by ticker.
    cache: HashMap<Symbol, PriceSeries>,
}

impl Reactor {
    pub fn new(resolver: WindowResolver) -> Self {
        Self::with_state(resolver, SelectionState::default())
    }

    pub fn with_state(resolver: WindowResolver, state: SelectionState) -> Self {
        Self {
            state,
            resolver,
            cache: HashMap::new(),
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn resolver(&self) -> &WindowResolver {
        &self.resolver
    }

    /// Apply one event and render the current selection.
    pub fn handle(&mut self, event: UiEvent) -> Render {
        info!(event = ?event, "handling event");
        let mut comparison = false;

        match event {
            UiEvent::TickersChanged(tickers) => {
                self.state.tickers = normalize_tickers(tickers);
                let selected = &self.state.tickers;
                self.cache.retain(|t, _| selected.contains(t));
            }
            UiEvent::TimeButton(preset) => self.set_window(TimeWindow::Preset(preset)),
            UiEvent::CustomRange { start, end } => {
                let window = TimeWindow::Range { start, end };
                if let Err(e) = window.bounds(self.resolver.today()) {
                    warn!(error = %e, "rejected custom range");
                    return Render::Prompt(e.to_string());
                }
                self.set_window(window);
            }
            UiEvent::ChartButton(kind) => self.state.kind = kind,
            UiEvent::OverlayButton(overlay) => {
                let active = self.state.overlays.toggle(overlay);
                debug!(overlay = overlay.short_label(), active, "toggled overlay");
            }
            UiEvent::EmaSmaButton => comparison = true,
            UiEvent::Refresh => self.cache.clear(),
        }

        if self.state.tickers.is_empty() {
            return Render::Prompt(NO_TICKER_PROMPT.to_string());
        }

        let loaded = self.load_selected();
        let charts = self
            .state
            .tickers
            .iter()
            .zip(loaded)
            .map(|(ticker, series)| TickerChart {
                ticker: ticker.clone(),
                outcome: series.map(|s| {
                    if comparison {
                        compose_comparison(&s)
                    } else {
                        compose(&s, self.state.kind, &self.state.overlays)
                    }
                }),
            })
            .collect();
        Render::Charts(charts)
    }

    /// Every window event refetches, even for the same preset, so a preset
    /// re-anchors on the resolver's current today.
    fn set_window(&mut self, window: TimeWindow) {
        self.cache.clear();
        self.state.window = window;
    }

    /// Series for every selected ticker, in selection order. Tickers not yet
    /// cached are fetched in parallel; failures are returned per ticker and
    /// are not cached.
    fn load_selected(&mut self) -> Vec<Result<PriceSeries, DashboardError>> {
        let missing: Vec<&Symbol> = self
            .state
            .tickers
            .iter()
            .filter(|t| !self.cache.contains_key(*t))
            .collect();

        let window = self.state.window;
        let resolver = &self.resolver;
        let fetched: Vec<(Symbol, Result<PriceSeries, DashboardError>)> = missing
            .par_iter()
            .map(|ticker| {
                info!(ticker = ticker.as_str(), %window, "fetching");
                ((*ticker).clone(), resolver.resolve(ticker, window))
            })
            .collect();

        let mut failures = HashMap::new();
        for (ticker, result) in fetched {
            match result {
                Ok(series) => {
                    self.cache.insert(ticker, series);
                }
                Err(e) => {
                    warn!(ticker = ticker.as_str(), error = %e, "ticker failed");
                    failures.insert(ticker, e);
                }
            }
        }

        self.state
            .tickers
            .iter()
            .map(|t| match failures.remove(t) {
                Some(e) => Err(e),
                None => self.cache.get(t).cloned().ok_or_else(|| {
                    DashboardError::DataUnavailable {
                        symbol: t.clone(),
                        reason: "not loaded".to_string(),
                    }
                }),
            })
            .collect()
    }
}

/// Uppercase, trim, drop blanks and repeats; keeps first-seen order.
fn normalize_tickers(tickers: Vec<Symbol>) -> Vec<Symbol> {
    let mut out: Vec<Symbol> = Vec::with_capacity(tickers.len());
    for t in tickers {
        let t = t.trim().to_ascii_uppercase();
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}
