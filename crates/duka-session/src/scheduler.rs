//! # Task Scheduler
//!
//! Cancellable recurring background tasks for a session.
//!
//! ## Task Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  spawn_periodic("stock-scan", 60s, task)                                │
//! │                                                                         │
//! │    ┌──────────────────────────────────────────────┐                     │
//! │    │  loop {                                      │                     │
//! │    │    select! {                                 │                     │
//! │    │      _ = interval.tick() => task().await     │                     │
//! │    │      _ = shutdown_rx.recv() => break         │                     │
//! │    │    }                                         │                     │
//! │    │  }                                           │                     │
//! │    └──────────────────────────────────────────────┘                     │
//! │                                                                         │
//! │  shutdown() → send on every channel, await every join handle            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A tick that falls due while the previous run is still executing is
//! delayed rather than bursted (`MissedTickBehavior::Delay`). The first
//! tick fires immediately on spawn.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Handle to one running periodic task.
struct TaskHandle {
    name: &'static str,
    shutdown_tx: mpsc::Sender<()>,
    join: JoinHandle<()>,
}

/// Owns the session's recurring tasks and stops them together.
#[derive(Default)]
pub struct Scheduler {
    tasks: Vec<TaskHandle>,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler { tasks: Vec::new() }
    }

    /// Spawns a named task that runs `task` every `period` until
    /// [`shutdown`](Self::shutdown) is called.
    pub fn spawn_periodic<F, Fut>(&mut self, name: &'static str, period: Duration, mut task: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let join = tokio::spawn(async move {
            info!(task = name, period_secs = period.as_secs(), "Periodic task started");

            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        debug!(task = name, "Tick");
                        task().await;
                    }
                    _ = shutdown_rx.recv() => {
                        info!(task = name, "Periodic task stopping");
                        break;
                    }
                }
            }
        });

        self.tasks.push(TaskHandle {
            name,
            shutdown_tx,
            join,
        });
    }

    /// Signals every task to stop and waits for them to finish.
    pub async fn shutdown(&mut self) {
        for task in &self.tasks {
            if task.shutdown_tx.send(()).await.is_err() {
                warn!(task = task.name, "Task already gone at shutdown");
            }
        }
        for task in self.tasks.drain(..) {
            if let Err(e) = task.join.await {
                warn!(task = task.name, error = %e, "Task join failed");
            }
        }
    }

    /// Number of currently registered tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        // Abort anything not shut down cleanly.
        for task in &self.tasks {
            task.join.abort();
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_fires_immediately_then_on_period() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut scheduler = Scheduler::new();

        let c = Arc::clone(&count);
        scheduler.spawn_periodic("counter", Duration::from_secs(10), move || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        // First tick is immediate
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);

        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_ticks() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut scheduler = Scheduler::new();

        let c = Arc::clone(&count);
        scheduler.spawn_periodic("counter", Duration::from_secs(5), move || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(1)).await;
        scheduler.shutdown().await;
        assert_eq!(scheduler.task_count(), 0);

        let before = count.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_multiple_tasks_shutdown_together() {
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));
        let mut scheduler = Scheduler::new();

        let ca = Arc::clone(&a);
        scheduler.spawn_periodic("a", Duration::from_secs(1), move || {
            let c = Arc::clone(&ca);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });
        let cb = Arc::clone(&b);
        scheduler.spawn_periodic("b", Duration::from_secs(2), move || {
            let c = Arc::clone(&cb);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        assert_eq!(scheduler.task_count(), 2);
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(a.load(Ordering::SeqCst) >= 4);
        assert!(b.load(Ordering::SeqCst) >= 2);

        scheduler.shutdown().await;
        assert_eq!(scheduler.task_count(), 0);
    }
}
