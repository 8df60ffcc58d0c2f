//! Stockdash TUI: terminal stock dashboard.
//!
//! Views:
//! 1. Charts - ticker picker plus one candlestick/line/OHLC chart per ticker
//! 2. Rules - indicator bound setter and current-rules table
//! 3. Help - keyboard shortcuts

mod app;
mod input;
mod panels;
mod theme;
mod ui;
mod worker;

use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stockdash_core::config::{app_dir, DashboardConfig};
use stockdash_core::reactor::{Reactor, UiEvent};
use stockdash_core::window::WindowResolver;

use crate::app::AppState;
use crate::worker::WorkerCommand;

const LOG_FILE: &str = "stockdash.log";

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    init_logging()?;

    let config = DashboardConfig::load(config_path.as_deref()).context("loading config")?;
    let provider = config.provider.build().context("building data provider")?;
    let universe = config.universe().context("loading ticker universe")?;
    info!(
        provider = provider.name(),
        tickers = universe.len(),
        "dashboard starting"
    );

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();

    let reactor = Reactor::new(WindowResolver::new(provider));
    let worker_handle = worker::spawn_worker(reactor, cmd_rx, resp_tx)?;

    let mut app = AppState::new(cmd_tx.clone(), resp_rx, universe, config.rule_book());

    // Pre-select configured tickers that exist in the universe.
    for symbol in &config.default_tickers {
        let symbol = symbol.trim().to_uppercase();
        if !app.tickers.universe.contains(&symbol) {
            warn!(symbol = %symbol, "default ticker not in universe, skipped");
        } else if !app.tickers.is_selected(&symbol) {
            app.tickers.selected.push(symbol);
        }
    }
    if app.tickers.selected.is_empty() {
        app.send_event(UiEvent::Refresh);
    } else {
        app.send_selection();
    }
    app.request_rule_series();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("dashboard stopped");
    result
}

/// Log to a file under the app directory; the terminal belongs to the UI.
fn init_logging() -> Result<()> {
    let dir = app_dir();
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let file = File::create(dir.join(LOG_FILE)).context("creating log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.apply(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
