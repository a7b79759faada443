//! Graceful shutdown handling for the game driver.
//!
//! Ctrl-C only raises a flag; the driver loop notices it between ticks and
//! the game is torn down here, releasing every input subscription.

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::app::App;

/// Manages graceful shutdown of the game driver.
pub struct ShutdownManager {
    shutdown_requested: Arc<AtomicBool>,
    report_on_exit: bool,
    exit_code: i32,
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownManager {
    /// Creates a new shutdown manager.
    pub fn new() -> Self {
        Self {
            shutdown_requested: Arc::new(AtomicBool::new(false)),
            report_on_exit: true,
            exit_code: 0,
        }
    }

    /// Flag shared with the ctrl-c task.
    pub fn flag(&self) -> Arc<AtomicBool> {
        self.shutdown_requested.clone()
    }

    /// Spawns a task that requests shutdown on ctrl-c.
    pub fn listen_for_ctrl_c(&self) {
        let flag = self.flag();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Ctrl+C received, initiating graceful shutdown...");
            flag.store(true, Ordering::SeqCst);
        });
    }

    /// Sets whether to log a final report during cleanup.
    pub fn set_report_on_exit(&mut self, report: bool) {
        self.report_on_exit = report;
    }

    /// Requests shutdown.
    pub fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        tracing::info!("Shutdown requested");
    }

    /// Checks if shutdown has been requested.
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }

    /// Returns whether cleanup logs a final report.
    pub fn should_report_on_exit(&self) -> bool {
        self.report_on_exit
    }

    /// Sets the exit code.
    pub fn set_exit_code(&mut self, code: i32) {
        self.exit_code = code;
    }

    /// Gets the exit code.
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Tears the game down and logs the final score.
    pub fn cleanup(&self, app: &mut App) -> Result<()> {
        tracing::info!("Performing shutdown cleanup...");
        app.game.teardown();

        if self.report_on_exit {
            let summary = app.board.summary();
            tracing::info!(
                seed = %app.seed(),
                ticks = app.game.tick_count(),
                score = app.game.score(),
                failed_ticks = app.game.metrics().failed_ticks(),
                luminance = summary.luminance,
                "Final report"
            );
        }

        tracing::info!("Cleanup complete");
        Ok(())
    }
}
