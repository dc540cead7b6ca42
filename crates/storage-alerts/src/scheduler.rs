//! # Alert Scheduler
//!
//! Background task that runs [`AlertEngine::check_now`] on a fixed period.
//!
//! ## Task Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Scheduler Task                                       │
//! │                                                                         │
//! │  spawn() ──► interval (first tick immediate)                           │
//! │                 │                                                       │
//! │      ┌──────────┼─────────────────┬──────────────────────┐              │
//! │      ▼          ▼                 ▼                      │              │
//! │   shutdown    tick            CheckNow(reply)            │              │
//! │      │          │                 │                      │              │
//! │      │          └── check_now ────┴── reply.send(result) │              │
//! │      ▼                                 │                 │              │
//! │    exit                                └─────────────────┘              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed periodic check is logged and the loop keeps going. Missed ticks
//! are delayed, never bunched.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::engine::AlertEngine;
use crate::error::{AlertError, AlertResult};
use storage_core::AlertStatus;

enum SchedulerCommand {
    CheckNow(oneshot::Sender<AlertResult<AlertStatus>>),
}

/// Handle for controlling the scheduler task.
pub struct SchedulerHandle {
    commands: mpsc::Sender<SchedulerCommand>,
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Runs a check on the scheduler task and waits for its result.
    pub async fn check_now(&self) -> AlertResult<AlertStatus> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(SchedulerCommand::CheckNow(reply_tx))
            .await
            .map_err(|_| AlertError::ShuttingDown)?;
        reply_rx
            .await
            .map_err(|_| AlertError::ChannelError("Check reply dropped".into()))?
    }

    /// Asks the task to stop. Returns immediately; use [`join`](Self::join)
    /// to wait for it.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the task to exit.
    pub async fn join(self) -> AlertResult<()> {
        self.task
            .await
            .map_err(|e| AlertError::Internal(format!("Scheduler task failed: {e}")))
    }

    /// Shutdown followed by join.
    pub async fn stop(self) -> AlertResult<()> {
        self.shutdown().await;
        self.join().await
    }
}

/// Spawns the periodic check on the current tokio runtime.
///
/// The first check runs right away, then every `period`.
pub fn spawn(engine: Arc<AlertEngine>, period: Duration) -> AlertResult<SchedulerHandle> {
    if period.is_zero() {
        return Err(AlertError::InvalidConfig("check period must be greater than 0".into()));
    }

    let (commands, command_rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    let task = tokio::spawn(run(engine, period, command_rx, shutdown_rx));

    Ok(SchedulerHandle {
        commands,
        shutdown_tx,
        task,
    })
}

async fn run(
    engine: Arc<AlertEngine>,
    period: Duration,
    mut command_rx: mpsc::Receiver<SchedulerCommand>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    info!(period_secs = period.as_secs_f64(), "Alert scheduler starting");

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            // Shutdown, or every handle dropped
            _ = shutdown_rx.recv() => {
                info!("Alert scheduler shutting down");
                break;
            }

            Some(command) = command_rx.recv() => match command {
                SchedulerCommand::CheckNow(reply) => {
                    let _ = reply.send(engine.check_now().await);
                }
            },

            _ = interval.tick() => {
                if let Err(e) = engine.check_now().await {
                    error!(error = %e, "Periodic alert check failed");
                }
            }
        }
    }

    info!("Alert scheduler stopped");
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::emitter::AlertEmitter;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use storage_core::{Money, Notification, Product};
    use storage_db::{Database, DbConfig};

    #[derive(Default)]
    struct CountingEmitter {
        checks: AtomicUsize,
    }

    impl AlertEmitter for CountingEmitter {
        fn on_alert_raised(&self, _notification: &Notification) {}
        fn on_status_changed(&self, _status: &AlertStatus) {
            self.checks.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn test_engine(emitter: Arc<CountingEmitter>) -> (Database, Arc<AlertEngine>) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.records::<Product>()
            .create(&Product::new("Pen", Money::zero(), Money::zero(), 1))
            .await
            .unwrap();
        let engine = AlertEngine::load_with_emitter(db.clone(), EngineConfig::default(), emitter)
            .await
            .unwrap();
        (db, Arc::new(engine))
    }

    async fn wait_for(counter: &AtomicUsize, at_least: usize) -> bool {
        for _ in 0..200 {
            if counter.load(Ordering::SeqCst) >= at_least {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_first_check_runs_immediately() {
        let emitter = Arc::new(CountingEmitter::default());
        let (_db, engine) = test_engine(emitter.clone()).await;

        let handle = spawn(engine.clone(), Duration::from_secs(3600)).unwrap();
        assert!(wait_for(&emitter.checks, 1).await);
        assert_eq!(engine.status().await.low_stock_count, 1);

        handle.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_periodic_checks_repeat() {
        let emitter = Arc::new(CountingEmitter::default());
        let (_db, engine) = test_engine(emitter.clone()).await;

        let handle = spawn(engine, Duration::from_millis(20)).unwrap();
        assert!(wait_for(&emitter.checks, 3).await);

        handle.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_check_now_and_shutdown() {
        let emitter = Arc::new(CountingEmitter::default());
        let (_db, engine) = test_engine(emitter).await;

        let handle = spawn(engine, Duration::from_secs(3600)).unwrap();
        let status = handle.check_now().await.unwrap();
        assert!(status.last_check.is_some());
        assert_eq!(status.notification_count, 1);

        handle.shutdown().await;
        for _ in 0..200 {
            if handle.is_finished() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(handle.is_finished());
        assert!(handle.check_now().await.is_err());
        handle.join().await.unwrap();
    }

    #[tokio::test]
    async fn test_zero_period_is_rejected() {
        let emitter = Arc::new(CountingEmitter::default());
        let (_db, engine) = test_engine(emitter).await;
        assert!(matches!(
            spawn(engine, Duration::ZERO),
            Err(AlertError::InvalidConfig(_))
        ));
    }
}
