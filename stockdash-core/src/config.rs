//! Dashboard configuration, read from TOML.
//!
//! Every field has a default, so an empty or missing file is a valid
//! configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::data::{
    CircuitBreaker, CsvProvider, DataProvider, SyntheticProvider, TickerUniverse, YahooProvider,
};
use crate::error::DashboardError;
use crate::rules::RuleBook;

pub const APP_DIR: &str = "stockdash";
pub const CONFIG_FILE: &str = "config.toml";

/// `<config_dir>/stockdash`, or `./stockdash` when the platform has none.
pub fn app_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Yahoo,
    Csv,
    Synthetic,
}

impl ProviderKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "yahoo" => Some(ProviderKind::Yahoo),
            "csv" => Some(ProviderKind::Csv),
            "synthetic" => Some(ProviderKind::Synthetic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Directory of `<SYMBOL>.csv` files for the csv provider.
    pub dir: PathBuf,
    /// Master seed for the synthetic provider.
    pub seed: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            dir: PathBuf::from("data"),
            seed: 42,
        }
    }
}

impl ProviderConfig {
    pub fn build(&self) -> Result<Arc<dyn DataProvider>, DashboardError> {
        info!(kind = ?self.kind, "building data provider");
        Ok(match self.kind {
            ProviderKind::Yahoo => {
                let breaker = Arc::new(CircuitBreaker::default());
                let provider = YahooProvider::new(breaker)
                    .map_err(|e| DashboardError::Config(format!("yahoo client: {e}")))?;
                Arc::new(provider)
            }
            ProviderKind::Csv => Arc::new(CsvProvider::new(&self.dir)),
            ProviderKind::Synthetic => Arc::new(SyntheticProvider::new(self.seed)),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            start: NaiveDate::from_ymd_opt(2019, 2, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2020, 4, 20).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub default_tickers: Vec<String>,
    pub universe_path: Option<PathBuf>,
    pub provider: ProviderConfig,
    pub rules: RulesConfig,
}

impl DashboardConfig {
    pub fn default_path() -> PathBuf {
        app_dir().join(CONFIG_FILE)
    }

    pub fn from_toml(content: &str) -> Result<Self, DashboardError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| DashboardError::Config(format!("parse config TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, DashboardError> {
        toml::to_string_pretty(self)
            .map_err(|e| DashboardError::Config(format!("serialize config: {e}")))
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, DashboardError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        info!(path = %path.display(), "loaded config");
        Self::from_toml(&content)
    }

    fn validate(&self) -> Result<(), DashboardError> {
        if self.rules.start > self.rules.end {
            return Err(DashboardError::Config(format!(
                "rules.start {} is after rules.end {}",
                self.rules.start, self.rules.end
            )));
        }
        if self.rules.symbol.trim().is_empty() {
            return Err(DashboardError::Config("rules.symbol is empty".to_string()));
        }
        Ok(())
    }

    /// The configured universe file, or the built-in list.
    pub fn universe(&self) -> Result<TickerUniverse, DashboardError> {
        match &self.universe_path {
            Some(path) => TickerUniverse::from_file(path),
            None => Ok(TickerUniverse::default_us()),
        }
    }

    pub fn rule_book(&self) -> RuleBook {
        RuleBook::new(
            self.rules.symbol.to_ascii_uppercase(),
            self.rules.start,
            self.rules.end,
        )
    }
}
