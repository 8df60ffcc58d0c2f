//! Custom buffer widgets.

pub mod price_chart;

pub use price_chart::PriceChart;
