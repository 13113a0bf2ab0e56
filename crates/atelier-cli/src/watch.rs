//! `atelier watch`: keep content fresh while a host feeds change signals.
//!
//! Host messages arrive one per line. A line that parses as JSON is used
//! as-is; anything else is treated as a bare string message, so both
//! `"focus"` and `focus` work.

use std::io::Write;
use std::sync::Arc;

use atelier_content::ContentSnapshot;
use atelier_core::{Error, Result};
use atelier_store::{ChangeSignal, ChangeTrigger, ContentStore, CycleReport, TriggerConfig};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

/// Counters for a finished watch session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchSummary {
    /// Input lines recognised as change signals.
    pub signals: usize,
    /// Signals that led to a refresh.
    pub refreshes: usize,
}

/// Classify one input line.
pub fn parse_host_message(line: &str) -> Option<ChangeSignal> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let message = serde_json::from_str::<Value>(line).unwrap_or_else(|_| json!(line));
    ChangeSignal::from_message(&message)
}

/// One-line JSON description of a published snapshot.
pub fn snapshot_summary(cycle: u64, snapshot: &ContentSnapshot, report: Option<&CycleReport>) -> Value {
    json!({
        "cycle": cycle,
        "services": snapshot.services.len(),
        "projects": snapshot.projects.len(),
        "gallery": snapshot.gallery.len(),
        "report": report,
    })
}

/// Load once, then refresh on signals read from `input` until it closes.
///
/// Summary lines go to stdout.
pub async fn run_watch<R>(
    store: Arc<ContentStore>,
    config: TriggerConfig,
    input: R,
) -> Result<WatchSummary>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    run_watch_to(store, config, input, std::io::stdout()).await
}

/// [`run_watch`] with summary lines written to `out`.
///
/// The printer is stopped only after the last refresh has published, and
/// it drains any snapshot it has not printed yet before exiting.
pub async fn run_watch_to<R, W>(
    store: Arc<ContentStore>,
    config: TriggerConfig,
    input: R,
    out: W,
) -> Result<WatchSummary>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: Write + Send + 'static,
{
    let updates = store.subscribe();
    let (stop_tx, stop_rx) = oneshot::channel();
    let printer = tokio::spawn(print_snapshots(Arc::clone(&store), updates, stop_rx, out));

    store.refresh().await;

    let trigger = ChangeTrigger::new(Arc::clone(&store), config);
    let (tx, rx) = mpsc::channel(16);
    let reader = tokio::spawn(forward_signals(input, tx));
    let refreshes = trigger.run(rx).await;
    let signals = reader.await.map_err(join_error)??;

    // The receiver only goes away if the printer already stopped.
    let _ = stop_tx.send(());
    printer.await.map_err(join_error)??;

    info!(signals, refreshes, "input closed, watch finished");
    Ok(WatchSummary { signals, refreshes })
}

async fn print_snapshots<W: Write>(
    store: Arc<ContentStore>,
    mut updates: watch::Receiver<Arc<ContentSnapshot>>,
    mut stop: oneshot::Receiver<()>,
    mut out: W,
) -> Result<()> {
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
            _ = &mut stop => {
                if updates.has_changed().unwrap_or(false) {
                    write_summary(&store, &mut updates, &mut out)?;
                }
                return Ok(());
            }
        }
        write_summary(&store, &mut updates, &mut out)?;
    }
}

fn write_summary<W: Write>(
    store: &ContentStore,
    updates: &mut watch::Receiver<Arc<ContentSnapshot>>,
    out: &mut W,
) -> Result<()> {
    let snapshot = updates.borrow_and_update().clone();
    let summary = snapshot_summary(
        store.cycles_completed(),
        &snapshot,
        store.last_report().as_ref(),
    );
    writeln!(out, "{summary}")?;
    out.flush()?;
    Ok(())
}

fn join_error(e: tokio::task::JoinError) -> Error {
    Error::io(std::io::Error::other(e.to_string()))
}

async fn forward_signals<R>(input: R, tx: mpsc::Sender<ChangeSignal>) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut forwarded = 0;
    while let Some(line) = lines.next_line().await? {
        match parse_host_message(&line) {
            Some(signal) => {
                if tx.send(signal).await.is_err() {
                    break;
                }
                forwarded += 1;
            }
            None => debug!(%line, "ignoring host message"),
        }
    }
    Ok(forwarded)
}
