//! Keyed background tasks
//!
//! Every store call the controller makes runs on a tokio task registered
//! under a [`TaskKey`] of `(resource, operation)`. Spawning under a key that
//! is still occupied aborts the older task.

use crate::error::ControllerError;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use gova_resource::Label;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::task::{AbortHandle, JoinHandle};
use ulid::Ulid;

/// Store operation a task performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// List fetch
    Fetch,
    /// Create-record save
    Save,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fetch => "fetch",
            Self::Save => "save",
        })
    }
}

/// Registry key of a background task
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskKey {
    /// Resource the task works on
    pub resource: Label,
    /// What it does
    pub operation: Operation,
}

impl TaskKey {
    /// Fetch key for `resource`
    #[inline]
    #[must_use]
    pub fn fetch(resource: Label) -> Self {
        Self {
            resource,
            operation: Operation::Fetch,
        }
    }

    /// Save key for `resource`
    #[inline]
    #[must_use]
    pub fn save(resource: Label) -> Self {
        Self {
            resource,
            operation: Operation::Save,
        }
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.operation, self.resource)
    }
}

/// Unique background task identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub Ulid);

impl TaskId {
    /// Generate new task ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Awaitable handle of a spawned task
#[derive(Debug)]
pub struct TaskHandle<T> {
    id: TaskId,
    key: TaskKey,
    inner: JoinHandle<T>,
}

impl<T> TaskHandle<T> {
    /// Task ID
    #[inline]
    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Registry key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &TaskKey {
        &self.key
    }

    /// Abort the task
    #[inline]
    pub fn abort(&self) {
        self.inner.abort();
    }

    /// Check if the task has finished, aborted tasks included
    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Wait for the task's output
    ///
    /// # Errors
    /// [`ControllerError::Cancelled`] if the task was aborted or superseded,
    /// [`ControllerError::TaskFailed`] if it panicked
    pub async fn wait(self) -> Result<T, ControllerError> {
        self.inner.await.map_err(|e| {
            if e.is_cancelled() {
                ControllerError::Cancelled
            } else {
                ControllerError::TaskFailed(e.to_string())
            }
        })
    }
}

/// Running tasks by key
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    running: Arc<DashMap<TaskKey, (TaskId, AbortHandle)>>,
}

impl TaskRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `fut` under `key`, aborting any task already running there
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn<F>(&self, key: TaskKey, fut: F) -> TaskHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let id = TaskId::new();
        let running = Arc::clone(&self.running);
        let task_key = key.clone();

        // the entry stays locked until the new task is recorded, so its
        // `Deregister` cannot run first and leave a stale entry behind
        let entry = self.running.entry(key.clone());
        let inner = tokio::spawn(async move {
            let _entry = Deregister {
                running,
                key: task_key,
                id,
            };
            fut.await
        });
        let previous = match entry {
            Entry::Occupied(mut occupied) => Some(occupied.insert((id, inner.abort_handle()))),
            Entry::Vacant(vacant) => {
                vacant.insert((id, inner.abort_handle()));
                None
            }
        };

        if let Some((previous, abort)) = previous {
            abort.abort();
            tracing::debug!(%key, task = %previous, "superseded running task");
        }

        TaskHandle { id, key, inner }
    }

    /// Abort the task running under `key`
    ///
    /// Returns whether one was running.
    pub fn cancel(&self, key: &TaskKey) -> bool {
        match self.running.remove(key) {
            Some((_, (id, abort))) => {
                abort.abort();
                tracing::debug!(%key, task = %id, "cancelled task");
                true
            }
            None => false,
        }
    }

    /// Abort every running task
    pub fn cancel_all(&self) {
        self.running.retain(|_, (_, abort)| {
            abort.abort();
            false
        });
    }

    /// Check if a task is running under `key`
    #[inline]
    #[must_use]
    pub fn is_running(&self, key: &TaskKey) -> bool {
        self.running.contains_key(key)
    }

    /// Number of running tasks
    #[inline]
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.running.len()
    }
}

/// Removes a task's registry entry when its future completes, panics or is aborted
struct Deregister {
    running: Arc<DashMap<TaskKey, (TaskId, AbortHandle)>>,
    key: TaskKey,
    id: TaskId,
}

impl Drop for Deregister {
    fn drop(&mut self) {
        let id = self.id;
        self.running.remove_if(&self.key, |_, (current, _)| *current == id);
    }
}
