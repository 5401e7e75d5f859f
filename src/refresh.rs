//! Registry of per-message auto-refresh tasks.
//!
//! Each price message has at most one repeating refresh task. Scheduling a
//! refresh for a message that already has one aborts the old task and
//! installs the new one, so hammering the refresh button never accumulates
//! duplicate timers. Entries carry a generation stamp: a task that ends on
//! its own only removes itself, never a successor that replaced it.

use std::{
    collections::HashMap,
    ops::ControlFlow,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::debug;

struct Entry {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Tracks the active refresh task per message id.
#[derive(Default)]
pub struct RefreshRegistry {
    tasks: Mutex<HashMap<u64, Entry>>,
    next_generation: AtomicU64,
}

impl RefreshRegistry {
    /// Creates an empty registry, ready to be shared across handlers.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Installs a repeating refresh task for `message_id`, replacing and
    /// aborting any task previously installed for it.
    ///
    /// `tick` runs once per `period` (the first run happens one full period
    /// after scheduling). Returning [`ControlFlow::Break`] stops the schedule
    /// and removes the registry entry; [`ControlFlow::Continue`] keeps it
    /// running.
    pub fn schedule<F, Fut>(self: &Arc<Self>, message_id: u64, period: Duration, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let registry = Arc::clone(self);

        // Hold the lock across spawn+insert so the new task cannot observe
        // the registry before its own entry exists.
        let mut tasks = self.lock_tasks();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tick().await.is_break() {
                    break;
                }
            }
            registry.deregister(message_id, generation);
        });

        if let Some(previous) = tasks.insert(message_id, Entry { generation, handle }) {
            debug!("Replacing refresh task for message {}", message_id);
            previous.handle.abort();
        }
    }

    /// Aborts and removes the refresh task for `message_id`, if any.
    ///
    /// Returns whether a task was actually cancelled.
    pub fn cancel(&self, message_id: u64) -> bool {
        match self.lock_tasks().remove(&message_id) {
            Some(entry) => {
                debug!("Cancelled refresh task for message {}", message_id);
                entry.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Number of currently registered refresh tasks.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.lock_tasks().len()
    }

    /// Removes an entry after its task ended, but only if the entry still
    /// belongs to that task and was not replaced in the meantime.
    fn deregister(&self, message_id: u64, generation: u64) {
        let mut tasks = self.lock_tasks();
        if tasks
            .get(&message_id)
            .is_some_and(|entry| entry.generation == generation)
        {
            tasks.remove(&message_id);
        }
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, HashMap<u64, Entry>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
