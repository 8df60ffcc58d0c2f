//! Stockdash CLI: render charts and rule tables without the terminal UI.
//!
//! Commands:
//! - `chart` - fetch tickers over a window and print the composed figures as JSON
//! - `indicator` - print one indicator series with summary statistics
//! - `tickers` - list the ticker universe
//! - `rules` - commit indicator bounds and print the resulting rule table

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stockdash_core::chart::{ChartKind, OverlayKind};
use stockdash_core::config::{DashboardConfig, ProviderKind};
use stockdash_core::data::TickerUniverse;
use stockdash_core::indicators::{Indicator, SeriesStats, Stochastic};
use stockdash_core::reactor::{Reactor, Render, UiEvent};
use stockdash_core::rules::{RuleInput, RuleMetric};
use stockdash_core::window::{TimeWindow, WindowPreset, WindowResolver};

#[derive(Parser)]
#[command(name = "stockdash", about = "Stockdash CLI: stock charts with indicator overlays")]
struct Cli {
    /// Config file. Defaults to <config_dir>/stockdash/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured data provider: yahoo, csv, synthetic.
    #[arg(long, global = true, value_parser = parse_provider)]
    provider: Option<ProviderKind>,

    #[command(subcommand)]
    command: Commands,
}

/// Window selection shared by commands that fetch prices.
#[derive(clap::Args)]
struct WindowArgs {
    /// Preset window: week, month, 60d, 90d, 180d, year.
    #[arg(long, value_parser = parse_preset, conflicts_with_all = ["start", "end"])]
    window: Option<WindowPreset>,

    /// Custom range start (YYYY-MM-DD). Requires --end.
    #[arg(long, requires = "end")]
    start: Option<NaiveDate>,

    /// Custom range end (YYYY-MM-DD). Requires --start.
    #[arg(long, requires = "start")]
    end: Option<NaiveDate>,
}

impl WindowArgs {
    fn window(&self) -> TimeWindow {
        match (self.window, self.start, self.end) {
            (_, Some(start), Some(end)) => TimeWindow::Range { start, end },
            (Some(preset), _, _) => TimeWindow::Preset(preset),
            _ => TimeWindow::default(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compose charts for one or more tickers and print them as JSON.
    Chart {
        /// Ticker symbol; repeat for several charts.
        #[arg(long = "symbol", required = true)]
        symbols: Vec<String>,

        #[command(flatten)]
        window: WindowArgs,

        /// Base trace: candlestick, line, ohlc.
        #[arg(long, value_parser = parse_kind, default_value = "candlestick")]
        kind: ChartKind,

        /// Overlay to toggle: ma, bb, ema, pp, vwap. Each repeat flips it again.
        #[arg(long = "overlay", value_parser = parse_overlay)]
        overlays: Vec<OverlayKind>,

        /// Print the EMA-vs-SMA comparison instead of the price chart.
        #[arg(long, default_value_t = false)]
        compare: bool,
    },
    /// Print one indicator series with summary statistics.
    Indicator {
        #[arg(long)]
        symbol: String,

        /// ma, ema, bb, pp, vwap, stochastic.
        #[arg(long)]
        name: String,

        #[command(flatten)]
        window: WindowArgs,
    },
    /// List the ticker universe.
    Tickers {
        /// CSV universe file (symbol[,label]). Defaults to the configured one.
        #[arg(long)]
        universe: Option<PathBuf>,
    },
    /// Set indicator bounds and print the rule table.
    Rules {
        /// bollinger or ma.
        #[arg(long)]
        metric: Option<String>,

        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        upper: f64,

        /// Only used by the Bollinger band metric.
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        mean: f64,

        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        lower: f64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut config = DashboardConfig::load(cli.config.as_deref()).context("loading config")?;
    if let Some(kind) = cli.provider {
        config.provider.kind = kind;
    }

    match cli.command {
        Commands::Chart {
            symbols,
            window,
            kind,
            overlays,
            compare,
        } => run_chart(&config, symbols, window.window(), kind, overlays, compare),
        Commands::Indicator {
            symbol,
            name,
            window,
        } => run_indicator(&config, &symbol, &name, window.window()),
        Commands::Tickers { universe } => run_tickers(&config, universe),
        Commands::Rules {
            metric,
            upper,
            mean,
            lower,
        } => run_rules(&config, metric.as_deref(), RuleInput { upper, mean, lower }),
    }
}

fn resolver(config: &DashboardConfig) -> Result<WindowResolver> {
    let provider = config.provider.build().context("building data provider")?;
    Ok(WindowResolver::new(provider))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_chart(
    config: &DashboardConfig,
    symbols: Vec<String>,
    window: TimeWindow,
    kind: ChartKind,
    overlays: Vec<OverlayKind>,
    compare: bool,
) -> Result<()> {
    let resolver = resolver(config)?;
    window.bounds(resolver.today())?;

    // Set everything up before choosing tickers so prices are fetched once.
    let mut reactor = Reactor::new(resolver);
    let window_event = match window {
        TimeWindow::Preset(p) => UiEvent::TimeButton(p),
        TimeWindow::Range { start, end } => UiEvent::CustomRange { start, end },
    };
    reactor.handle(window_event);
    reactor.handle(UiEvent::ChartButton(kind));
    for overlay in overlays {
        reactor.handle(UiEvent::OverlayButton(overlay));
    }

    let mut render = reactor.handle(UiEvent::TickersChanged(symbols));
    if compare {
        render = reactor.handle(UiEvent::EmaSmaButton);
    }

    let failed = render.charts().iter().filter(|c| c.outcome.is_err()).count();
    info!(
        charts = render.charts().len(),
        failed,
        window = %reactor.state().window,
        "rendered"
    );
    if let Render::Prompt(msg) = &render {
        bail!("{msg}");
    }
    print_json(&render)
}

#[derive(Serialize)]
struct IndicatorReport {
    symbol: String,
    window: String,
    series: Vec<SeriesReport>,
}

#[derive(Serialize)]
struct SeriesReport {
    name: String,
    stats: SeriesStats,
    points: Vec<(NaiveDate, Option<f64>)>,
}

fn indicators_named(name: &str) -> Option<Vec<Box<dyn Indicator>>> {
    match name.to_ascii_lowercase().as_str() {
        "stochastic" | "stoch" => Some(vec![Box::new(Stochastic)]),
        other => OverlayKind::parse(other).map(OverlayKind::indicators),
    }
}

fn run_indicator(config: &DashboardConfig, symbol: &str, name: &str, window: TimeWindow) -> Result<()> {
    let Some(indicators) = indicators_named(name) else {
        bail!("unknown indicator '{name}' (expected ma, ema, bb, pp, vwap, stochastic)");
    };
    let symbol = symbol.trim().to_uppercase();
    let series = resolver(config)?
        .resolve(&symbol, window)
        .with_context(|| format!("fetching {symbol}"))?;

    let report = IndicatorReport {
        symbol,
        window: window.to_string(),
        series: indicators
            .iter()
            .map(|ind| {
                let s = ind.series(&series);
                SeriesReport {
                    name: s.name.clone(),
                    stats: s.describe(),
                    points: s.points,
                }
            })
            .collect(),
    };
    print_json(&report)
}

fn run_tickers(config: &DashboardConfig, universe: Option<PathBuf>) -> Result<()> {
    let universe = match universe {
        Some(path) => TickerUniverse::from_file(&path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => config.universe()?,
    };
    for info in universe.tickers() {
        if info.label == info.symbol {
            println!("{}", info.symbol);
        } else {
            println!("{}\t{}", info.symbol, info.label);
        }
    }
    Ok(())
}

fn run_rules(config: &DashboardConfig, metric: Option<&str>, input: RuleInput) -> Result<()> {
    let metric = match metric {
        None => None,
        Some(m) => match RuleMetric::parse(m) {
            Some(metric) => Some(metric),
            None => bail!("unknown metric '{m}' (expected bollinger or ma)"),
        },
    };

    let mut book = config.rule_book();
    if let Some(metric) = metric {
        book.commit(metric, input)?;
    }
    let table = book.view(metric)?;

    println!("{:<18} {}", table.columns[0], table.columns[1]);
    for (label, value) in &table.rows {
        println!("{label:<18} {value}");
    }
    Ok(())
}

fn parse_provider(s: &str) -> Result<ProviderKind, String> {
    ProviderKind::parse(s).ok_or_else(|| format!("unknown provider '{s}' (yahoo, csv, synthetic)"))
}

fn parse_preset(s: &str) -> Result<WindowPreset, String> {
    WindowPreset::parse(s).ok_or_else(|| format!("unknown window '{s}' (week, month, 60d, 90d, 180d, year)"))
}

fn parse_kind(s: &str) -> Result<ChartKind, String> {
    ChartKind::parse(s).ok_or_else(|| format!("unknown chart kind '{s}' (candlestick, line, ohlc)"))
}

fn parse_overlay(s: &str) -> Result<OverlayKind, String> {
    OverlayKind::parse(s).ok_or_else(|| format!("unknown overlay '{s}' (ma, bb, ema, pp, vwap)"))
}
