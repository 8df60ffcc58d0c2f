//! Dashboard-level error type.
//!
//! Short rolling histories and flat bars are not errors: indicators report
//! them as undefined values.

use thiserror::Error;

use crate::data::DataError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DashboardError {
    /// The provider failed or returned no rows for this symbol.
    #[error("no data for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl DashboardError {
    pub fn data_unavailable(symbol: &str, cause: &DataError) -> Self {
        DashboardError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: cause.to_string(),
        }
    }

    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, DashboardError::DataUnavailable { .. })
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(e: std::io::Error) -> Self {
        DashboardError::Io(e.to_string())
    }
}
