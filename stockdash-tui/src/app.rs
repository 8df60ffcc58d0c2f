//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. The reactor lives on the worker thread; this
//! side keeps the last render and selection it reported.

use std::sync::mpsc::{Receiver, Sender};

use chrono::NaiveDate;
use tracing::warn;

use stockdash_core::data::TickerUniverse;
use stockdash_core::reactor::{Render, SelectionState, UiEvent};
use stockdash_core::rules::{MetricSnapshot, RuleBook, RuleError, RuleInput, RuleMetric, RuleTable};

use crate::worker::{WorkerCommand, WorkerResponse};

/// Which view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Charts,
    Rules,
    Help,
}

impl View {
    pub const ALL: [View; 3] = [View::Charts, View::Rules, View::Help];

    pub fn index(self) -> usize {
        match self {
            View::Charts => 0,
            View::Rules => 1,
            View::Help => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Charts => "Charts",
            View::Rules => "Rules",
            View::Help => "Help",
        }
    }

    pub fn next(self) -> View {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }

    pub fn prev(self) -> View {
        View::ALL[(self.index() + View::ALL.len() - 1) % View::ALL.len()]
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    /// Custom date range prompt.
    Range,
}

/// Ticker list with cursor and ordered selection.
#[derive(Debug)]
pub struct TickerListState {
    pub universe: TickerUniverse,
    pub cursor: usize,
    /// Selected symbols in the order they were picked.
    pub selected: Vec<String>,
}

impl TickerListState {
    pub fn new(universe: TickerUniverse) -> Self {
        Self {
            universe,
            cursor: 0,
            selected: Vec::new(),
        }
    }

    pub fn cursor_symbol(&self) -> Option<&str> {
        self.universe
            .tickers()
            .get(self.cursor)
            .map(|t| t.symbol.as_str())
    }

    pub fn is_selected(&self, symbol: &str) -> bool {
        self.selected.iter().any(|s| s == symbol)
    }

    /// Toggle the ticker under the cursor. Returns false if the list is empty.
    pub fn toggle_cursor(&mut self) -> bool {
        let Some(symbol) = self.cursor_symbol().map(str::to_string) else {
            return false;
        };
        if let Some(pos) = self.selected.iter().position(|s| *s == symbol) {
            self.selected.remove(pos);
        } else {
            self.selected.push(symbol);
        }
        true
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.universe.len() {
            self.cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }
}

/// Input slot order: upper, mean, lower.
pub const SLOT_UPPER: usize = 0;
pub const SLOT_MEAN: usize = 1;
pub const SLOT_LOWER: usize = 2;

/// Rule builder state.
#[derive(Debug)]
pub struct RulesPanelState {
    pub book: RuleBook,
    pub metric: Option<RuleMetric>,
    /// 0 = metric selector, 1.. = bound inputs of the current metric.
    pub field: usize,
    pub inputs: [String; 3],
    /// Odd presses of "view current rules" show the table.
    pub show_rules: bool,
    pub snapshots: Vec<MetricSnapshot>,
    pub loading: bool,
}

impl RulesPanelState {
    pub fn new(book: RuleBook) -> Self {
        Self {
            book,
            metric: None,
            field: 0,
            inputs: Default::default(),
            show_rules: false,
            snapshots: Vec::new(),
            loading: false,
        }
    }

    /// Input slots shown for a metric, top to bottom.
    pub fn slots(metric: RuleMetric) -> &'static [usize] {
        if metric.has_mean_bound() {
            &[SLOT_UPPER, SLOT_MEAN, SLOT_LOWER]
        } else {
            &[SLOT_UPPER, SLOT_LOWER]
        }
    }

    pub fn field_count(&self) -> usize {
        1 + self.metric.map_or(0, |m| Self::slots(m).len())
    }

    /// Slot index of the focused input, if an input is focused.
    pub fn focused_slot(&self) -> Option<usize> {
        let metric = self.metric?;
        self.field
            .checked_sub(1)
            .and_then(|i| Self::slots(metric).get(i).copied())
    }

    /// None → Bollinger → Moving average → None.
    pub fn cycle_metric(&mut self, forward: bool) {
        let order = [None, Some(RuleMetric::BollingerBand), Some(RuleMetric::MovingAverage)];
        let pos = order.iter().position(|m| *m == self.metric).unwrap_or(0);
        let next = if forward {
            (pos + 1) % order.len()
        } else {
            (pos + order.len() - 1) % order.len()
        };
        self.metric = order[next];
        self.inputs = Default::default();
        self.field = self.field.min(self.field_count() - 1);
    }

    pub fn snapshot(&self, metric: RuleMetric) -> Option<&MetricSnapshot> {
        self.snapshots.iter().find(|s| s.metric == metric)
    }

    pub fn edit_focused(&mut self, c: char) {
        if let Some(slot) = self.focused_slot() {
            if c.is_ascii_digit() || c == '.' || c == '-' {
                self.inputs[slot].push(c);
            }
        }
    }

    pub fn backspace_focused(&mut self) {
        if let Some(slot) = self.focused_slot() {
            self.inputs[slot].pop();
        }
    }

    /// Parse the typed bounds. Blank inputs count as 0.
    pub fn parse_input(&self) -> Result<RuleInput, String> {
        let parse = |slot: usize, name: &str| -> Result<f64, String> {
            let raw = self.inputs[slot].trim();
            if raw.is_empty() {
                return Ok(0.0);
            }
            raw.parse::<f64>()
                .map_err(|_| format!("{name} bound is not a number: {raw}"))
        };
        Ok(RuleInput {
            upper: parse(SLOT_UPPER, "upper")?,
            mean: parse(SLOT_MEAN, "mean")?,
            lower: parse(SLOT_LOWER, "lower")?,
        })
    }

    pub fn table(&self) -> Result<RuleTable, RuleError> {
        self.book.view(self.metric)
    }
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub view: View,
    pub running: bool,
    pub overlay: Overlay,
    pub range_input: String,

    // View states
    pub tickers: TickerListState,
    pub rules: RulesPanelState,

    // Last report from the worker
    pub selection: SelectionState,
    pub render: Option<Render>,
    pub page: usize,
    pub pending: usize,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    pub status_message: Option<(String, StatusLevel)>,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        universe: TickerUniverse,
        book: RuleBook,
    ) -> Self {
        Self {
            view: View::Charts,
            running: true,
            overlay: Overlay::None,
            range_input: String::new(),
            tickers: TickerListState::new(universe),
            rules: RulesPanelState::new(book),
            selection: SelectionState::default(),
            render: None,
            page: 0,
            pending: 0,
            worker_tx,
            worker_rx,
            status_message: None,
        }
    }

    /// Send a UI event to the reactor.
    pub fn send_event(&mut self, event: UiEvent) {
        match self.worker_tx.send(WorkerCommand::Event(event)) {
            Ok(()) => self.pending += 1,
            Err(_) => self.set_error("worker thread has stopped"),
        }
    }

    /// Push the current ticker selection to the reactor.
    pub fn send_selection(&mut self) {
        let tickers = self.tickers.selected.clone();
        self.send_event(UiEvent::TickersChanged(tickers));
    }

    pub fn request_rule_series(&mut self) {
        let (start, end) = self.rules.book.range();
        let cmd = WorkerCommand::LoadRuleSeries {
            symbol: self.rules.book.symbol().to_string(),
            start,
            end,
        };
        match self.worker_tx.send(cmd) {
            Ok(()) => self.rules.loading = true,
            Err(_) => self.set_error("worker thread has stopped"),
        }
    }

    /// Parse "YYYY-MM-DD YYYY-MM-DD" from the range prompt and send it.
    pub fn submit_range(&mut self) {
        let input = std::mem::take(&mut self.range_input);
        self.overlay = Overlay::None;
        match parse_range(&input) {
            Ok((start, end)) => self.send_event(UiEvent::CustomRange { start, end }),
            Err(msg) => self.set_warning(msg),
        }
    }

    pub fn commit_rules(&mut self) {
        let Some(metric) = self.rules.metric else {
            self.set_warning(RuleError::NoMetricSelected.to_string());
            return;
        };
        let result = self
            .rules
            .parse_input()
            .and_then(|input| self.rules.book.commit(metric, input).map_err(|e| e.to_string()));
        match result {
            Ok(()) => self.set_status(format!("Rules updated for {}", metric.label())),
            Err(msg) => self.set_warning(msg),
        }
    }

    /// Apply one worker response.
    pub fn apply(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::Rendered { render, state } => {
                self.pending = self.pending.saturating_sub(1);
                match &render {
                    Render::Prompt(msg) => self.set_status(msg.clone()),
                    Render::Charts(charts) => {
                        let failed = charts.iter().filter(|c| c.outcome.is_err()).count();
                        if failed == 0 {
                            self.set_status(format!("{} | {}", state.window, state.kind));
                        } else {
                            self.set_warning(format!(
                                "{failed} of {} tickers unavailable",
                                charts.len()
                            ));
                        }
                        self.page = self.page.min(charts.len().saturating_sub(1));
                    }
                }
                self.selection = state;
                self.render = Some(render);
            }
            WorkerResponse::RuleSeries(result) => {
                self.rules.loading = false;
                match result {
                    Ok(series) => {
                        self.rules.snapshots = RuleMetric::ALL
                            .into_iter()
                            .map(|m| MetricSnapshot::compute(m, &series))
                            .collect();
                    }
                    Err(e) => {
                        warn!(error = %e, "rule series unavailable");
                        self.set_error(e.to_string());
                    }
                }
            }
        }
    }

    pub fn chart_count(&self) -> usize {
        self.render.as_ref().map_or(0, |r| r.charts().len())
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.chart_count() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }
}

fn parse_range(input: &str) -> Result<(NaiveDate, NaiveDate), String> {
    let mut parts = input.split_whitespace();
    let (Some(a), Some(b), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err("range must be two dates: YYYY-MM-DD YYYY-MM-DD".to_string());
    };
    let parse = |s: &str| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| format!("not a date: {s}"))
    };
    Ok((parse(a)?, parse(b)?))
}
