//! Tick metrics and structured logging for a running game.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Counters updated once per committed tick.
#[derive(Debug)]
pub struct Metrics {
    tick_count: AtomicU64,
    score: AtomicI64,
    active_count: AtomicU64,
    failed_ticks: AtomicU64,
    report_interval: u64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Metrics {
    /// Logs a summary every `report_interval` ticks.
    #[must_use]
    pub fn new(report_interval: u64) -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            score: AtomicI64::new(0),
            active_count: AtomicU64::new(0),
            failed_ticks: AtomicU64::new(0),
            report_interval: report_interval.max(1),
        }
    }

    /// Records a committed tick.
    pub fn record_tick(&self, duration: Duration, score: i64, delta: i64, active: usize) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.score.store(score, Ordering::Relaxed);
        self.active_count.store(active as u64, Ordering::Relaxed);

        tracing::debug!(tick, score, delta, active, "Tick committed");
        if tick.is_multiple_of(self.report_interval) {
            tracing::info!(
                tick = tick,
                score = score,
                active = active,
                duration_us = duration.as_micros() as u64,
                "Game tick"
            );
        }
    }

    /// Records a tick that was rolled back.
    pub fn record_failure(&self, error: &dyn std::fmt::Display) {
        self.failed_ticks.fetch_add(1, Ordering::Relaxed);
        tracing::error!(error = %error, "Tick failed, state not committed");
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn score(&self) -> i64 {
        self.score.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn active_count(&self) -> u64 {
        self.active_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn failed_ticks(&self) -> u64 {
        self.failed_ticks.load(Ordering::Relaxed)
    }
}

/// Installs the global tracing subscriber; `RUST_LOG` overrides `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .ok();
}
