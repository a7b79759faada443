pub mod board;
pub mod script;
pub mod shutdown;
pub mod state;

pub use board::{Board, BoardSummary};
pub use script::{KeyPress, KeyScript};
pub use shutdown::ShutdownManager;
pub use state::{App, RunMode};

use anyhow::Result;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::model::TickSnapshot;

/// Snapshots buffered between the game loop and its consumer.
pub const SNAPSHOT_BUFFER: usize = 64;

/// Spawns the snapshot consumer.
///
/// With `json` every snapshot is printed as one JSON line on stdout;
/// otherwise a per-tick summary is logged at debug level. The task ends once
/// every sender is dropped and yields the number of snapshots it consumed.
pub fn spawn_snapshot_consumer(json: bool) -> (mpsc::Sender<TickSnapshot>, JoinHandle<u64>) {
    let (tx, mut rx) = mpsc::channel::<TickSnapshot>(SNAPSHOT_BUFFER);
    let consumer = tokio::spawn(async move {
        let mut consumed = 0;
        while let Some(snapshot) = rx.recv().await {
            consumed += 1;
            if json {
                match snapshot.to_json_line() {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::warn!(error = %e, "Snapshot not serializable"),
                }
            } else {
                tracing::debug!(
                    tick = snapshot.tick,
                    score = snapshot.score,
                    delta = snapshot.delta,
                    active = snapshot.nodes.iter().filter(|n| n.active).count(),
                    "Snapshot"
                );
            }
        }
        consumed
    });
    (tx, consumer)
}

impl App {
    /// Ticks until `ticks` is reached, shutdown is requested, or a tick fails.
    ///
    /// Headless runs default to one full game. Snapshots are offered to
    /// `snapshots` without blocking; a full channel drops them.
    pub async fn run(
        &mut self,
        shutdown: &ShutdownManager,
        ticks: Option<u64>,
        snapshots: Option<mpsc::Sender<TickSnapshot>>,
    ) -> Result<()> {
        let limit = match (ticks, self.mode) {
            (Some(n), _) => Some(n),
            (None, RunMode::Headless) => Some(self.default_ticks()),
            (None, RunMode::Realtime) => None,
        };
        let mut interval = tokio::time::interval(Duration::from_millis(self.config.update_ms()));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut snapshots = snapshots;

        tracing::info!(?limit, update_ms = self.config.update_ms(), "Game started");

        while self.running && !shutdown.is_shutdown_requested() {
            if limit.is_some_and(|l| self.game.tick_count() >= l) {
                break;
            }
            match self.mode {
                RunMode::Realtime => {
                    interval.tick().await;
                }
                RunMode::Headless => tokio::task::yield_now().await,
            }

            if let Err(e) = self.step() {
                tracing::error!(error = %e, tick = self.game.tick_count(), "Tick failed, stopping");
                self.running = false;
                return Err(e);
            }

            let closed = match &snapshots {
                Some(tx) => match tx.try_send(self.game.snapshot()?) {
                    Ok(()) => false,
                    Err(TrySendError::Full(_)) => {
                        tracing::debug!(tick = self.game.tick_count(), "Snapshot dropped");
                        false
                    }
                    Err(TrySendError::Closed(_)) => true,
                },
                None => false,
            };
            if closed {
                tracing::warn!("Snapshot consumer gone");
                snapshots = None;
            }
        }

        self.running = false;
        tracing::info!(
            ticks = self.game.tick_count(),
            score = self.game.score(),
            "Game stopped"
        );
        Ok(())
    }
}
