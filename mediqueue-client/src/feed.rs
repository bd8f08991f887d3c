//! Turn feed poller
//!
//! Maintains a live snapshot of the active turns and the single next
//! turn, refreshed on a fixed interval. The snapshot is a read-only,
//! eventually consistent mirror of server state; the acceptable
//! staleness window is one interval. Polling (not server push) is a
//! deliberate design choice, since the backend contract exposes no
//! subscription channel.
//!
//! The poll loop is a single worker task that awaits each round before
//! the next tick, so overlapping requests cannot occur. The two
//! sub-fetches of a round fan out concurrently and fail independently:
//! one failing endpoint never wipes the other's data.

use crate::http::HttpClient;
use shared::Turn;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Poller configuration
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Interval between background refreshes
    pub refresh_interval_ms: u64,
    /// When false, only the initial fetch and manual refreshes run
    pub auto_refresh: bool,
    /// Ask the server to include non-active turns as well
    pub include_inactive: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 5_000,
            auto_refresh: true,
            include_inactive: false,
        }
    }
}

/// Snapshot of the queue as last seen by the poller
///
/// On a failed refresh the previous data is kept and `error` is set, so
/// the display degrades to "last known state + banner" instead of
/// flashing empty.
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    /// Active turns across all areas
    pub turns: Vec<Turn>,
    /// The single next turn, when the endpoint reports one
    pub next_turn: Option<Turn>,
    /// True while a loud (non-silent) refresh is in flight
    pub loading: bool,
    /// Message of the most recent refresh failure, cleared on success
    pub error: Option<String>,
    /// Wall-clock time of the last successful refresh (millis)
    pub last_updated_ms: Option<i64>,
}

/// Handle to the polling worker
///
/// Dropping the feed cancels the worker and its timer; no orphan timers
/// survive teardown. In-flight requests resolve into a watch channel
/// whose receivers are gone, so late responses update nothing.
pub struct TurnFeed {
    snapshot_rx: watch::Receiver<FeedSnapshot>,
    refresh_tx: mpsc::Sender<bool>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl TurnFeed {
    /// Spawn the polling worker
    ///
    /// Performs an immediate loud fetch, then refreshes silently every
    /// `refresh_interval_ms` while `auto_refresh` is on.
    pub fn spawn(client: HttpClient, config: FeedConfig) -> Self {
        let (snapshot_tx, snapshot_rx) = watch::channel(FeedSnapshot::default());
        let (refresh_tx, refresh_rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(run_worker(
            client,
            config,
            snapshot_tx,
            refresh_rx,
            cancel.clone(),
        ));

        Self {
            snapshot_rx,
            refresh_tx,
            cancel,
            handle: Some(handle),
        }
    }

    /// Current snapshot (cheap clone of the watch value)
    pub fn snapshot(&self) -> FeedSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Subscribe to snapshot updates
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Request an immediate refresh, bypassing the timer
    ///
    /// `silent` refreshes do not toggle the snapshot's loading flag, to
    /// avoid flicker on background updates.
    pub async fn refresh(&self, silent: bool) {
        let _ = self.refresh_tx.send(silent).await;
    }

    /// Immediate loud refresh (user-initiated "retry"/"refresh" action)
    pub async fn force_refresh(&self) {
        self.refresh(false).await;
    }

    /// Stop the worker and wait for it to finish
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TurnFeed {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_worker(
    client: HttpClient,
    config: FeedConfig,
    snapshot_tx: watch::Sender<FeedSnapshot>,
    mut refresh_rx: mpsc::Receiver<bool>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(Duration::from_millis(config.refresh_interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut first = true;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Turn feed stopped");
                break;
            }
            _ = ticker.tick() => {
                if first {
                    // Initial fetch is loud so the view can show a spinner
                    refresh_once(&client, &config, &snapshot_tx, false).await;
                    first = false;
                } else if config.auto_refresh {
                    refresh_once(&client, &config, &snapshot_tx, true).await;
                }
            }
            Some(silent) = refresh_rx.recv() => {
                refresh_once(&client, &config, &snapshot_tx, silent).await;
                // Manual refresh restarts the staleness window
                ticker.reset();
            }
        }
    }
}

/// One refresh round: fan out the sub-fetches, apply what resolved
async fn refresh_once(
    client: &HttpClient,
    config: &FeedConfig,
    snapshot_tx: &watch::Sender<FeedSnapshot>,
    silent: bool,
) {
    if !silent {
        snapshot_tx.send_modify(|snap| snap.loading = true);
    }

    // Independent fetches: each fails on its own without blocking the other
    let (turns_result, next_result) = tokio::join!(
        client.public_turns(config.include_inactive),
        client.next_turn(),
    );

    snapshot_tx.send_modify(|snap| {
        snap.loading = false;

        let mut error: Option<String> = None;
        let mut any_success = false;

        match turns_result {
            Ok(turns) => {
                snap.turns = turns;
                any_success = true;
            }
            Err(e) => {
                // Keep the previous turns; surface the failure instead
                warn!(error = %e, "Active turns fetch failed, keeping last snapshot");
                error = Some(e.user_message());
            }
        }

        match next_result {
            Ok(next) => {
                snap.next_turn = next;
                any_success = true;
            }
            Err(e) => {
                warn!(error = %e, "Next turn fetch failed");
                error.get_or_insert_with(|| e.user_message());
            }
        }

        snap.error = error;
        if any_success {
            snap.last_updated_ms = Some(shared::util::now_millis());
        }
    });
}
