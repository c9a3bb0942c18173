use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::filter::{Filter, SortMode};
use crate::persistence::{Persistence, Snapshot};
use crate::storage::KeyValueStorage;
use crate::task::{Task, TaskId, normalize_text};

/// What a successful store operation changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Added(TaskId),
    Toggled { id: TaskId, completed: bool },
    Deleted(TaskId),
    Edited(TaskId),
    FilterChanged(Filter),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&StoreChange)>;

/// Owns the authoritative task list and view settings.
///
/// Every operation is a silent no-op on invalid input or an unknown id.
/// A successful mutation bumps [`TaskStore::revision`], is written through
/// the persistence adapter, and is then announced to subscribers, in that
/// order.
pub struct TaskStore<S> {
    persistence: Persistence<S>,
    tasks: Vec<Task>,
    filter: Filter,
    sort: SortMode,
    revision: u64,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl<S: KeyValueStorage> TaskStore<S> {
    /// Rehydrates from `storage` under `prefix`. Nothing is written until the
    /// first mutation.
    #[tracing::instrument(skip(storage))]
    pub fn open(storage: S, prefix: &str) -> Self {
        let (persistence, snapshot) = Persistence::open(storage, prefix);
        let Snapshot {
            tasks,
            filter,
            sort,
        } = snapshot;

        info!(count = tasks.len(), filter = %filter, "opened task store");
        Self {
            persistence,
            tasks,
            filter,
            sort,
            revision: 0,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// The authoritative list in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn storage(&self) -> &S {
        self.persistence.storage()
    }

    pub fn add_task(&mut self, text: &str) -> Option<TaskId> {
        self.add_task_at(text, Utc::now())
    }

    #[tracing::instrument(skip(self, text))]
    pub fn add_task_at(&mut self, text: &str, now: DateTime<Utc>) -> Option<TaskId> {
        let Some(task) = Task::new(text, now) else {
            debug!("ignoring blank task text");
            return None;
        };

        let id = task.id().clone();
        debug!(id = %id, "adding task");
        self.tasks.push(task);
        self.commit(StoreChange::Added(id.clone()));
        Some(id)
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn toggle_task(&mut self, id: &TaskId) -> bool {
        let Some(idx) = self.position(id) else {
            debug!("toggle target not found");
            return false;
        };

        let replacement = self.tasks[idx].toggled();
        let completed = replacement.is_completed();
        self.tasks[idx] = replacement;
        self.commit(StoreChange::Toggled {
            id: id.clone(),
            completed,
        });
        true
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn delete_task(&mut self, id: &TaskId) -> bool {
        let Some(idx) = self.position(id) else {
            debug!("delete target not found");
            return false;
        };

        self.tasks.remove(idx);
        self.commit(StoreChange::Deleted(id.clone()));
        true
    }

    /// Replaces the text of `id`. Blank text never reaches the list.
    #[tracing::instrument(skip(self, text), fields(id = %id))]
    pub fn edit_task(&mut self, id: &TaskId, text: &str) -> bool {
        let Some(text) = normalize_text(text) else {
            debug!("ignoring blank edit");
            return false;
        };
        let Some(idx) = self.position(id) else {
            debug!("edit target not found");
            return false;
        };
        if self.tasks[idx].text() == text {
            return false;
        }

        self.tasks[idx] = self.tasks[idx].with_text(text);
        self.commit(StoreChange::Edited(id.clone()));
        true
    }

    #[tracing::instrument(skip(self))]
    pub fn set_filter(&mut self, filter: Filter) -> bool {
        if self.filter == filter {
            return false;
        }

        self.filter = filter;
        self.commit(StoreChange::FilterChanged(filter));
        true
    }

    /// Tasks passing the active filter, ordered by the sort mode. Always a
    /// fresh vector; the authoritative list is left as is.
    pub fn derived_view(&self) -> Vec<Task> {
        let mut view: Vec<Task> = self
            .tasks
            .iter()
            .filter(|task| self.filter.matches(task))
            .cloned()
            .collect();
        self.sort.apply(&mut view);
        view
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&StoreChange) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        debug!(subscription = id.0, "observer subscribed");
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        before != self.observers.len()
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id() == id)
    }

    fn commit(&mut self, change: StoreChange) {
        self.revision += 1;
        self.persistence.save(&self.tasks, self.filter, self.sort);
        for (_, observer) in &mut self.observers {
            observer(&change);
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for TaskStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskStore")
            .field("persistence", &self.persistence)
            .field("tasks", &self.tasks)
            .field("filter", &self.filter)
            .field("sort", &self.sort)
            .field("revision", &self.revision)
            .field("observers", &self.observers.len())
            .finish()
    }
}
