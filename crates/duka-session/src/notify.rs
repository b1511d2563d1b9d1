//! # Notification Center
//!
//! Dual-write notification sink: a transient in-memory log the UI reads,
//! mirrored best-effort to a durable store.
//!
//! ## Emission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  emit(kind, category, title, message, action?, metadata?)               │
//! │                                                                         │
//! │  1. Append to the in-memory log (capped at 20, read=false)   SYNC      │
//! │  2. Cue hook for Error/Success kinds only                    SYNC      │
//! │  3. Mirror to the durable store                              SPAWNED   │
//! │     └── failure → tracing::warn!, NEVER propagates, NEVER              │
//! │         rolls back step 1                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `mark_read` / `mark_all_read` / `clear` touch only the in-memory log
//! and its derived unread counter.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use duka_api::{NotificationRecord, NotificationStore};
use duka_core::types::NotificationKind;
use duka_core::MAX_NOTIFICATION_LOG;

// =============================================================================
// Notification
// =============================================================================

/// A transient, user-visible notification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub category: String,
    pub title: String,
    pub message: String,
    pub action: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Cue Hook
// =============================================================================

/// Short audible/visual cue hook (implemented by the UI shell).
pub trait NotificationCue: Send + Sync {
    fn cue(&self, kind: NotificationKind);
}

/// No-op cue for headless use and tests.
pub struct NoOpCue;

impl NotificationCue for NoOpCue {
    fn cue(&self, _kind: NotificationKind) {}
}

// =============================================================================
// Notification Center
// =============================================================================

/// The dual-write sink.
///
/// ## Thread Safety
/// The log lives behind a `Mutex` because scheduler tasks and the
/// submitter emit concurrently with UI reads. Operations are quick;
/// the lock is never held across an await point.
pub struct NotificationCenter {
    log: Mutex<VecDeque<Notification>>,
    cue: Arc<dyn NotificationCue>,
    store: Arc<dyn NotificationStore>,
}

impl NotificationCenter {
    pub fn new(store: Arc<dyn NotificationStore>, cue: Arc<dyn NotificationCue>) -> Self {
        NotificationCenter {
            log: Mutex::new(VecDeque::new()),
            cue,
            store,
        }
    }

    /// Records a notification and mirrors it to the durable store.
    ///
    /// The mirror write is spawned and best-effort: its failure is
    /// logged locally and never affects the transient entry. Returns
    /// the transient notification's id.
    pub fn emit(
        &self,
        kind: NotificationKind,
        category: &str,
        title: &str,
        message: &str,
        action: Option<String>,
        metadata: Option<serde_json::Value>,
    ) -> String {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            kind,
            category: category.to_string(),
            title: title.to_string(),
            message: message.to_string(),
            action: action.clone(),
            metadata: metadata.clone(),
            read: false,
            created_at: Utc::now(),
        };
        let id = notification.id.clone();

        // Step 1: transient log, capped at the most recent entries.
        {
            let mut log = self.log.lock().expect("Notification log mutex poisoned");
            log.push_back(notification);
            while log.len() > MAX_NOTIFICATION_LOG {
                log.pop_front();
            }
        }

        // Step 2: cue for error/success only.
        if kind.triggers_cue() {
            self.cue.cue(kind);
        }

        // Step 3: best-effort durable mirror.
        let record = NotificationRecord {
            kind,
            title: title.to_string(),
            message: message.to_string(),
            action,
            category: category.to_string(),
            is_persistent: true,
            priority: priority_for(kind).to_string(),
            metadata,
        };
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(e) = store.persist(&record).await {
                warn!(error = %e, title = %record.title, "Notification mirror write failed");
            } else {
                debug!(title = %record.title, "Notification mirrored");
            }
        });

        id
    }

    /// Marks one notification as read. Unknown ids are a no-op.
    pub fn mark_read(&self, id: &str) {
        let mut log = self.log.lock().expect("Notification log mutex poisoned");
        if let Some(n) = log.iter_mut().find(|n| n.id == id) {
            n.read = true;
        }
    }

    /// Marks every notification as read.
    pub fn mark_all_read(&self) {
        let mut log = self.log.lock().expect("Notification log mutex poisoned");
        for n in log.iter_mut() {
            n.read = true;
        }
    }

    /// Empties the transient log. The durable mirror is untouched.
    pub fn clear(&self) {
        self.log
            .lock()
            .expect("Notification log mutex poisoned")
            .clear();
    }

    /// Number of unread entries.
    pub fn unread_count(&self) -> usize {
        self.log
            .lock()
            .expect("Notification log mutex poisoned")
            .iter()
            .filter(|n| !n.read)
            .count()
    }

    /// Snapshot of the log, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.log
            .lock()
            .expect("Notification log mutex poisoned")
            .iter()
            .cloned()
            .collect()
    }
}

/// Durable-store priority label per kind.
fn priority_for(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Error => "high",
        NotificationKind::Success | NotificationKind::Warning => "medium",
        NotificationKind::Info => "low",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use duka_api::{ApiError, ApiResult};

    /// Store that counts persist calls and optionally fails them.
    struct RecordingStore {
        calls: AtomicUsize,
        fail: bool,
    }

    impl RecordingStore {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(RecordingStore {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl NotificationStore for RecordingStore {
        async fn persist(&self, _record: &NotificationRecord) -> ApiResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ApiError::Status {
                    endpoint: "POST /notifications".to_string(),
                    status: 500,
                    body: "boom".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    /// Cue that counts invocations.
    struct CountingCue(AtomicUsize);

    impl NotificationCue for CountingCue {
        fn cue(&self, _kind: NotificationKind) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn center(store: Arc<RecordingStore>, cue: Arc<CountingCue>) -> NotificationCenter {
        NotificationCenter::new(store, cue)
    }

    async fn drain_spawned() {
        // Current-thread test runtime: yielding lets spawned mirrors run.
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_emit_appends_unread() {
        let c = center(RecordingStore::new(false), Arc::new(CountingCue(AtomicUsize::new(0))));

        c.emit(NotificationKind::Info, "system", "Hello", "World", None, None);

        let log = c.notifications();
        assert_eq!(log.len(), 1);
        assert!(!log[0].read);
        assert_eq!(c.unread_count(), 1);
    }

    #[tokio::test]
    async fn test_log_capped_at_twenty() {
        let c = center(RecordingStore::new(false), Arc::new(CountingCue(AtomicUsize::new(0))));

        for i in 0..25 {
            c.emit(
                NotificationKind::Info,
                "system",
                &format!("n{}", i),
                "m",
                None,
                None,
            );
        }

        let log = c.notifications();
        assert_eq!(log.len(), MAX_NOTIFICATION_LOG);
        // Oldest entries fell off
        assert_eq!(log[0].title, "n5");
        assert_eq!(log.last().unwrap().title, "n24");
    }

    #[tokio::test]
    async fn test_cue_only_for_error_and_success() {
        let cue = Arc::new(CountingCue(AtomicUsize::new(0)));
        let c = center(RecordingStore::new(false), Arc::clone(&cue));

        c.emit(NotificationKind::Info, "system", "a", "m", None, None);
        c.emit(NotificationKind::Warning, "system", "b", "m", None, None);
        assert_eq!(cue.0.load(Ordering::SeqCst), 0);

        c.emit(NotificationKind::Success, "system", "c", "m", None, None);
        c.emit(NotificationKind::Error, "system", "d", "m", None, None);
        assert_eq!(cue.0.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_persist_failure_is_swallowed() {
        let store = RecordingStore::new(true);
        let c = center(Arc::clone(&store), Arc::new(CountingCue(AtomicUsize::new(0))));

        c.emit(NotificationKind::Error, "transaction", "Failed", "m", None, None);
        drain_spawned().await;

        // The mirror was attempted and failed...
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
        // ...but the transient entry is intact.
        assert_eq!(c.notifications().len(), 1);
    }

    #[tokio::test]
    async fn test_persist_receives_each_emission() {
        let store = RecordingStore::new(false);
        let c = center(Arc::clone(&store), Arc::new(CountingCue(AtomicUsize::new(0))));

        c.emit(NotificationKind::Info, "system", "a", "m", None, None);
        c.emit(NotificationKind::Info, "system", "b", "m", None, None);
        drain_spawned().await;

        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_mark_read_and_counters() {
        let c = center(RecordingStore::new(false), Arc::new(CountingCue(AtomicUsize::new(0))));

        let id = c.emit(NotificationKind::Info, "system", "a", "m", None, None);
        c.emit(NotificationKind::Info, "system", "b", "m", None, None);
        assert_eq!(c.unread_count(), 2);

        c.mark_read(&id);
        assert_eq!(c.unread_count(), 1);

        c.mark_all_read();
        assert_eq!(c.unread_count(), 0);

        c.clear();
        assert!(c.notifications().is_empty());
    }
}
