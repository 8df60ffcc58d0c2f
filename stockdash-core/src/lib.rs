//! StockDash Core: price series, indicators, data providers, chart composition.
//!
//! This crate holds everything the dashboard frontends share:
//! - Domain types (price rows, ordered price series)
//! - Indicator engine (moving averages, Bollinger bands, pivot points, VWAP, stochastic)
//! - Market-data providers (Yahoo, CSV, synthetic) and the ticker universe
//! - Time-window resolution and chart composition into a renderable figure
//! - The selection-state reactor and the threshold rule book

pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod reactor;
pub mod rules;
pub mod window;

pub use error::DashboardError;
