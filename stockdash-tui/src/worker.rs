//! Background worker thread that owns the reactor.
//!
//! The UI thread sends commands over `mpsc`; the worker handles them one at a
//! time, so each event runs to completion before the next is read. Per-ticker
//! fetches run on a private rayon pool, not the global one.

use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use chrono::NaiveDate;
use tracing::{info, warn};

use stockdash_core::domain::PriceSeries;
use stockdash_core::reactor::{Reactor, Render, SelectionState, UiEvent};
use stockdash_core::window::TimeWindow;
use stockdash_core::DashboardError;

const POOL_THREADS: usize = 4;

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Event(UiEvent),
    /// Fetch the rule panel's fixed series.
    LoadRuleSeries {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    Rendered {
        render: Render,
        state: SelectionState,
    },
    RuleSeries(Result<PriceSeries, DashboardError>),
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    reactor: Reactor,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("stockdash-worker".into())
        .spawn(move || worker_loop(reactor, rx, tx))
}

fn worker_loop(mut reactor: Reactor, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(POOL_THREADS)
        .thread_name(|i| format!("stockdash-fetch-{i}"))
        .build()
        .map_err(|e| warn!(error = %e, "private pool unavailable, using global pool"))
        .ok();

    info!(provider = reactor.resolver().provider_name(), "worker started");
    loop {
        let response = match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::Event(event)) => {
                let render = match &pool {
                    Some(pool) => pool.install(|| reactor.handle(event)),
                    None => reactor.handle(event),
                };
                WorkerResponse::Rendered {
                    render,
                    state: reactor.state().clone(),
                }
            }
            Ok(WorkerCommand::LoadRuleSeries { symbol, start, end }) => WorkerResponse::RuleSeries(
                reactor
                    .resolver()
                    .resolve(&symbol, TimeWindow::Range { start, end }),
            ),
        };
        if tx.send(response).is_err() {
            break;
        }
    }
    info!("worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::time::Duration;

    use stockdash_core::chart::OverlayKind;
    use stockdash_core::data::SyntheticProvider;
    use stockdash_core::window::WindowResolver;

    fn spawn() -> (Sender<WorkerCommand>, Receiver<WorkerResponse>, JoinHandle<()>) {
        let resolver = WindowResolver::new(Arc::new(SyntheticProvider::new(5)))
            .with_today(NaiveDate::from_ymd_opt(2024, 6, 28).unwrap());
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(Reactor::new(resolver), cmd_rx, resp_tx).unwrap();
        (cmd_tx, resp_rx, handle)
    }

    #[test]
    fn events_are_answered_in_order() {
        let (tx, rx, handle) = spawn();
        tx.send(WorkerCommand::Event(UiEvent::TickersChanged(vec!["AAPL".into()])))
            .unwrap();
        tx.send(WorkerCommand::Event(UiEvent::OverlayButton(OverlayKind::MovingAverage)))
            .unwrap();

        let first = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        let second = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        match (first, second) {
            (
                WorkerResponse::Rendered { state: s1, .. },
                WorkerResponse::Rendered { render, state: s2 },
            ) => {
                assert!(s1.overlays.is_empty());
                assert!(s2.overlays.contains(OverlayKind::MovingAverage));
                assert_eq!(render.charts().len(), 1);
            }
            other => panic!("unexpected responses: {other:?}"),
        }

        tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn loads_rule_series() {
        let (tx, rx, handle) = spawn();
        tx.send(WorkerCommand::LoadRuleSeries {
            symbol: "AAPL".into(),
            start: NaiveDate::from_ymd_opt(2019, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2020, 4, 20).unwrap(),
        })
        .unwrap();
        match rx.recv_timeout(Duration::from_secs(10)).unwrap() {
            WorkerResponse::RuleSeries(Ok(series)) => assert!(series.len() > 250),
            other => panic!("unexpected response: {other:?}"),
        }
        drop(tx);
        handle.join().unwrap();
    }
}
