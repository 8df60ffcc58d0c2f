//! Time windows and the resolver that turns one into a price series.

use std::fmt;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::data::DataProvider;
use crate::domain::PriceSeries;
use crate::error::DashboardError;

/// Named "last N calendar days through today" windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPreset {
    Week,
    Month,
    Days60,
    Days90,
    Days180,
    Year,
}

impl WindowPreset {
    pub const ALL: [WindowPreset; 6] = [
        WindowPreset::Week,
        WindowPreset::Month,
        WindowPreset::Days60,
        WindowPreset::Days90,
        WindowPreset::Days180,
        WindowPreset::Year,
    ];

    pub fn days(self) -> i64 {
        match self {
            WindowPreset::Week => 7,
            WindowPreset::Month => 30,
            WindowPreset::Days60 => 60,
            WindowPreset::Days90 => 90,
            WindowPreset::Days180 => 180,
            WindowPreset::Year => 365,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WindowPreset::Week => "Week view",
            WindowPreset::Month => "Month view",
            WindowPreset::Days60 => "60 Days view",
            WindowPreset::Days90 => "90 Days view",
            WindowPreset::Days180 => "180 Days view",
            WindowPreset::Year => "Year view",
        }
    }

    /// Parse CLI-style names: week, month, 60d, 90d, 180d, year.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "week" | "7d" => Some(WindowPreset::Week),
            "month" | "30d" => Some(WindowPreset::Month),
            "60d" => Some(WindowPreset::Days60),
            "90d" => Some(WindowPreset::Days90),
            "180d" => Some(WindowPreset::Days180),
            "year" | "365d" => Some(WindowPreset::Year),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeWindow {
    Preset(WindowPreset),
    Range { start: NaiveDate, end: NaiveDate },
}

impl Default for TimeWindow {
    fn default() -> Self {
        TimeWindow::Preset(WindowPreset::Year)
    }
}

impl TimeWindow {
    /// Concrete inclusive bounds relative to `today`.
    pub fn bounds(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), DashboardError> {
        match *self {
            TimeWindow::Preset(p) => Ok((today - Duration::days(p.days()), today)),
            TimeWindow::Range { start, end } if start > end => Err(
                DashboardError::InvalidSelection(format!("range start {start} is after end {end}")),
            ),
            TimeWindow::Range { start, end } => Ok((start, end)),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeWindow::Preset(p) => f.write_str(p.label()),
            TimeWindow::Range { start, end } => write!(f, "{start} to {end}"),
        }
    }
}

/// Fetches the price series for a ticker over a time window.
#[derive(Clone)]
pub struct WindowResolver {
    provider: Arc<dyn DataProvider>,
    pinned_today: Option<NaiveDate>,
}

impl WindowResolver {
    pub fn new(provider: Arc<dyn DataProvider>) -> Self {
        Self {
            provider,
            pinned_today: None,
        }
    }

    /// Fix "today" instead of reading the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.pinned_today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.pinned_today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn resolve(&self, ticker: &str, window: TimeWindow) -> Result<PriceSeries, DashboardError> {
        let (start, end) = window.bounds(self.today())?;
        debug!(ticker, %start, %end, provider = self.provider.name(), "resolving window");

        let fetched = self.provider.fetch(ticker, start, end).map_err(|e| {
            warn!(ticker, error = %e, "fetch failed");
            DashboardError::data_unavailable(ticker, &e)
        })?;

        if fetched.rows.is_empty() {
            warn!(ticker, %start, %end, "fetch returned no rows");
            return Err(DashboardError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: format!("no rows between {start} and {end}"),
            });
        }
        Ok(PriceSeries::from_unordered(ticker, fetched.rows))
    }
}
