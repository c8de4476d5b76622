//! Periodic threshold recalibration off the request path.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use super::MergeEngine;

/// Handle to a running recalibration task
#[derive(Debug)]
pub struct RecalibrationHandle {
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
}

impl RecalibrationHandle {
    /// Stop the task and wait for it to finish
    pub async fn shutdown(self) {
        self.shutdown.notify_one();
        if let Err(e) = self.task.await {
            tracing::warn!("Recalibration task ended abnormally: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Recalibrate every `period`, starting immediately.
///
/// Results are logged, and applied when `calibration.auto_apply` is set.
/// Missed ticks are skipped rather than bunched up.
pub fn spawn_recalibration(engine: Arc<MergeEngine>, period: Duration) -> RecalibrationHandle {
    let shutdown = Arc::new(Notify::new());
    let shutdown_clone = shutdown.clone();

    let task = tokio::spawn(async move {
        tracing::info!("Recalibration task started (interval: {:?})", period);

        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    run_once(&engine).await;
                }
                _ = shutdown_clone.notified() => {
                    break;
                }
            }
        }

        tracing::info!("Recalibration task stopped");
    });

    RecalibrationHandle { shutdown, task }
}

async fn run_once(engine: &MergeEngine) {
    let result = match engine.recalibrate_thresholds().await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Scheduled recalibration failed: {}", e);
            return;
        }
    };

    if !engine.config().calibration.auto_apply {
        tracing::debug!("Auto-apply disabled; calibration result not applied");
        return;
    }

    if engine.current_thresholds().thresholds == result.thresholds {
        return;
    }

    if let Err(e) = engine.apply_calibration(&result) {
        tracing::error!("Failed to apply calibrated thresholds: {}", e);
    }
}
