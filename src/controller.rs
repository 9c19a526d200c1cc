//! Task controller with optimistic completion toggling.
//!
//! The controller exclusively owns the local [`TaskCollection`]. Every local
//! mutation is followed by a [`ChangeEvent`] to subscribed observers, which
//! render from events or from [`TaskController::snapshot`] and never mutate
//! the collection themselves.
//!
//! `toggle` flips the local flag before the remote call and reconciles when
//! it settles: the server's record replaces the local one on success, the
//! previous flag is restored on failure. Ids with an unsettled toggle are
//! tracked; further mutations of the same id are rejected with
//! [`ControllerError::Busy`] and refresh snapshots leave them alone.
//!
//! Locks are never held across an await point.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::collection::{SnapshotDiff, Stats, TaskCollection};
use crate::ports::remote::{ListQuery, NewTask, RemoteError, TaskService};
use crate::task::{normalize_text, InvalidText, Task, TaskId};

/// Errors returned by controller operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    /// No local record with this id. Nothing was changed or sent.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// A toggle for this id has not settled yet. Nothing was changed or sent.
    #[error("task {0} has an update in flight")]
    Busy(TaskId),
    /// Task text was empty.
    #[error(transparent)]
    InvalidText(#[from] InvalidText),
    /// The remote call failed. Local state was restored where it had changed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Notification fired after every local mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// The collection was replaced wholesale (load, bulk replace).
    Loaded {
        /// The new collection contents.
        tasks: Vec<Task>,
    },
    /// A refresh snapshot changed the collection.
    Refreshed {
        /// What changed relative to the previous local state.
        diff: SnapshotDiff,
    },
    /// A completion flag was flipped locally ahead of the server.
    Optimistic {
        /// The record as it now stands locally.
        task: Task,
    },
    /// The server confirmed a toggle and its record was adopted.
    Reconciled {
        /// The server's record.
        task: Task,
        /// The server reported a different status than the one requested.
        anomaly: bool,
    },
    /// A toggle failed and the previous flag was restored.
    RolledBack {
        /// The restored record.
        task: Task,
        /// Why the remote call failed.
        error: RemoteError,
    },
    /// A task was created on the server and appended.
    Created {
        /// The server's record.
        task: Task,
    },
    /// A task's text was updated on the server.
    Updated {
        /// The server's record.
        task: Task,
    },
    /// A task was deleted on the server and removed.
    Deleted {
        /// Id of the removed record.
        id: TaskId,
    },
}

/// Callback invoked with every [`ChangeEvent`].
pub type Observer = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

#[derive(Default)]
struct State {
    tasks: TaskCollection,
    in_flight: HashSet<TaskId>,
    query: ListQuery,
}

impl State {
    /// Merges a server snapshot with local records that have a toggle in flight.
    fn merge(&self, snapshot: Vec<Task>) -> Vec<Task> {
        let mut merged: Vec<Task> = snapshot
            .into_iter()
            .map(|remote| match self.in_flight_record(remote.id) {
                Some(local) => local.clone(),
                None => remote,
            })
            .collect();
        for local in self.tasks.iter().filter(|task| self.in_flight.contains(&task.id)) {
            if !merged.iter().any(|task| task.id == local.id) {
                merged.push(local.clone());
            }
        }
        merged
    }

    fn in_flight_record(&self, id: TaskId) -> Option<&Task> {
        if self.in_flight.contains(&id) {
            self.tasks.get(id)
        } else {
            None
        }
    }

    fn ensure_idle(&self, id: TaskId) -> Result<(), ControllerError> {
        if self.tasks.get(id).is_none() {
            return Err(ControllerError::NotFound(id));
        }
        if self.in_flight.contains(&id) {
            return Err(ControllerError::Busy(id));
        }
        Ok(())
    }
}

/// Owns the local task list and keeps it in step with a [`TaskService`].
pub struct TaskController<'a> {
    remote: &'a dyn TaskService,
    state: Mutex<State>,
    observers: Mutex<Vec<Observer>>,
}

impl<'a> TaskController<'a> {
    /// Creates a controller with an empty collection.
    #[must_use]
    pub fn new(remote: &'a dyn TaskService) -> Self {
        Self::with_tasks(remote, Vec::new())
    }

    /// Creates a controller seeded with `tasks`, without contacting the server.
    #[must_use]
    pub fn with_tasks(remote: &'a dyn TaskService, tasks: Vec<Task>) -> Self {
        let state = State { tasks: TaskCollection::from_tasks(tasks), ..State::default() };
        Self { remote, state: Mutex::new(state), observers: Mutex::new(Vec::new()) }
    }

    /// Registers an observer for every subsequent [`ChangeEvent`].
    pub fn subscribe(&self, observer: impl Fn(&ChangeEvent) + Send + Sync + 'static) {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner).push(Arc::new(observer));
    }

    /// Returns a copy of the local collection in order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Task> {
        self.state().tasks.to_vec()
    }

    /// Returns a copy of the local record with `id`.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<Task> {
        self.state().tasks.get(id).cloned()
    }

    /// Returns `true` while a toggle for `id` has not settled.
    #[must_use]
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.state().in_flight.contains(&id)
    }

    /// Summary counts over the local collection.
    #[must_use]
    pub fn stats(&self) -> Stats {
        self.state().tasks.stats()
    }

    /// Fetches the task list and replaces the local collection with it.
    ///
    /// The query is remembered and reused by [`refresh`](Self::refresh).
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Remote`] if the fetch fails; local state is
    /// unchanged in that case.
    pub async fn load(&self, query: ListQuery) -> Result<Vec<Task>, ControllerError> {
        let snapshot = self.remote.list_tasks(query).await?;
        let tasks = {
            let mut state = self.state();
            state.query = query;
            let merged = state.merge(snapshot);
            state.tasks.replace_all(merged);
            state.tasks.to_vec()
        };
        info!(count = tasks.len(), "loaded tasks");
        self.notify(&ChangeEvent::Loaded { tasks: tasks.clone() });
        Ok(tasks)
    }

    /// Fetches the task list and applies it, keeping local records whose
    /// toggle is still in flight.
    ///
    /// Returns what changed relative to the previous local state.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Remote`] if the fetch fails; local state is
    /// unchanged in that case.
    pub async fn refresh(&self) -> Result<SnapshotDiff, ControllerError> {
        let query = self.state().query;
        let snapshot = self.remote.list_tasks(query).await?;
        let diff = {
            let mut state = self.state();
            let merged = state.merge(snapshot);
            let diff = state.tasks.diff(&merged);
            state.tasks.replace_all(merged);
            diff
        };
        if !diff.is_empty() {
            debug!(
                added = diff.added.len(),
                removed = diff.removed.len(),
                changed = diff.changed.len(),
                "refresh changed local state"
            );
            self.notify(&ChangeEvent::Refreshed { diff: diff.clone() });
        }
        Ok(diff)
    }

    /// Flips the completion flag of `id` locally, then confirms it remotely.
    ///
    /// Observers see the optimistic value before the remote call is issued.
    /// On success the server's record replaces the local one in full, even if
    /// its status differs from the one requested. On failure the previous
    /// flag is restored and nothing else is touched.
    ///
    /// # Errors
    ///
    /// - [`ControllerError::NotFound`] if there is no local record; no call is made.
    /// - [`ControllerError::Busy`] if a toggle for `id` is still in flight.
    /// - [`ControllerError::Remote`] if the call failed and was rolled back.
    pub async fn toggle(&self, id: TaskId) -> Result<Task, ControllerError> {
        let optimistic = {
            let mut state = self.state();
            state.ensure_idle(id)?;
            let Some(task) = state.tasks.get_mut(id) else {
                return Err(ControllerError::NotFound(id));
            };
            task.completed = !task.completed;
            let optimistic = task.clone();
            state.in_flight.insert(id);
            optimistic
        };
        let requested = optimistic.completed;
        debug!(task = %id, completed = requested, "optimistic toggle");
        self.notify(&ChangeEvent::Optimistic { task: optimistic });

        let result = match self.remote.set_completion(id, requested).await {
            Ok(confirmed) if confirmed.id != id => Err(RemoteError::Malformed(format!(
                "server returned task {} for task {id}",
                confirmed.id
            ))),
            other => other,
        };

        match result {
            Ok(confirmed) => {
                let anomaly = confirmed.completed != requested;
                {
                    let mut state = self.state();
                    state.in_flight.remove(&id);
                    if state.tasks.replace(confirmed.clone()).is_none() {
                        debug!(task = %id, "task left the collection before its toggle settled");
                    }
                }
                if anomaly {
                    warn!(
                        task = %id,
                        requested,
                        confirmed = confirmed.completed,
                        "server confirmed a different status than requested"
                    );
                }
                self.notify(&ChangeEvent::Reconciled { task: confirmed.clone(), anomaly });
                Ok(confirmed)
            }
            Err(error) => {
                let restored = {
                    let mut state = self.state();
                    state.in_flight.remove(&id);
                    state.tasks.get_mut(id).map(|task| {
                        task.completed = !requested;
                        task.clone()
                    })
                };
                warn!(task = %id, %error, "toggle failed, restored previous status");
                if let Some(task) = restored {
                    self.notify(&ChangeEvent::RolledBack { task, error: error.clone() });
                }
                Err(ControllerError::Remote(error))
            }
        }
    }

    /// Creates a task on the server and appends the returned record.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::InvalidText`] for blank text, or
    /// [`ControllerError::Remote`] if the server call fails.
    pub async fn create(&self, text: &str) -> Result<Task, ControllerError> {
        let text = normalize_text(text)?;
        let task = self.remote.create_task(&text, false).await?;
        {
            let mut state = self.state();
            if !state.tasks.push(task.clone()) {
                state.tasks.replace(task.clone());
            }
        }
        info!(task = %task.id, "created task");
        self.notify(&ChangeEvent::Created { task: task.clone() });
        Ok(task)
    }

    /// Replaces the text of `id` on the server, then locally.
    ///
    /// If a toggle of `id` started while the update was in flight, the local
    /// completion flag is kept until that toggle settles.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::InvalidText`], [`ControllerError::NotFound`],
    /// [`ControllerError::Busy`], or [`ControllerError::Remote`].
    pub async fn edit(&self, id: TaskId, text: &str) -> Result<Task, ControllerError> {
        let text = normalize_text(text)?;
        self.state().ensure_idle(id)?;
        let mut task = self.remote.update_text(id, &text).await?;
        {
            let mut state = self.state();
            // A toggle may have started while the edit was awaiting the server.
            if let Some(local) = state.in_flight_record(id) {
                task.completed = local.completed;
            }
            state.tasks.replace(task.clone());
        }
        self.notify(&ChangeEvent::Updated { task: task.clone() });
        Ok(task)
    }

    /// Deletes `id` on the server, then locally.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::NotFound`], [`ControllerError::Busy`], or
    /// [`ControllerError::Remote`].
    pub async fn delete(&self, id: TaskId) -> Result<(), ControllerError> {
        self.state().ensure_idle(id)?;
        self.remote.delete_task(id).await?;
        self.state().tasks.remove(id);
        info!(task = %id, "deleted task");
        self.notify(&ChangeEvent::Deleted { id });
        Ok(())
    }

    /// Replaces every task on the server and adopts the returned records.
    ///
    /// A toggle started while the call was in flight keeps its local record.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Busy`] while any toggle is in flight, or
    /// [`ControllerError::Remote`] if the server call fails.
    pub async fn replace_all(&self, tasks: &[NewTask]) -> Result<Vec<Task>, ControllerError> {
        if let Some(id) = self.state().in_flight.iter().next().copied() {
            return Err(ControllerError::Busy(id));
        }
        let created = self.remote.replace_all(tasks).await?;
        let tasks = {
            let mut state = self.state();
            let merged = state.merge(created);
            state.tasks.replace_all(merged);
            state.tasks.to_vec()
        };
        info!(count = tasks.len(), "replaced all tasks");
        self.notify(&ChangeEvent::Loaded { tasks: tasks.clone() });
        Ok(tasks)
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Calls every observer without holding the observer lock, so observers
    /// may subscribe further observers.
    fn notify(&self, event: &ChangeEvent) {
        let observers: Vec<Observer> =
            self.observers.lock().unwrap_or_else(PoisonError::into_inner).clone();
        for observer in &observers {
            observer(event);
        }
    }
}
