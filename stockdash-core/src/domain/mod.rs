//! Domain types for StockDash

pub mod price;

pub use price::{PriceRow, PriceSeries, SeriesError};

/// Symbol type alias
pub type Symbol = String;
