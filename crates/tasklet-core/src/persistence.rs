use std::collections::HashSet;
use std::str::FromStr;

use anyhow::Context;
use tracing::{debug, error, info, warn};

use crate::filter::{Filter, SortMode};
use crate::storage::KeyValueStorage;
use crate::task::Task;

pub const DEFAULT_PREFIX: &str = "todo-app-";

/// Everything the adapter persists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub filter: Filter,
    pub sort: SortMode,
}

/// The three entry names, all sharing one namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub todos: String,
    pub filter: String,
    pub sort: String,
}

impl StorageKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            todos: format!("{prefix}todos"),
            filter: format!("{prefix}filter"),
            sort: format!("{prefix}sort"),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }
}

/// Reads and writes the task list and view settings.
///
/// The only way to obtain one is [`Persistence::open`], which performs the
/// initial load. A `save` can therefore never run ahead of it and clobber
/// stored tasks with an empty startup state.
#[derive(Debug)]
pub struct Persistence<S> {
    storage: S,
    keys: StorageKeys,
}

impl<S: KeyValueStorage> Persistence<S> {
    #[tracing::instrument(skip(storage))]
    pub fn open(storage: S, prefix: &str) -> (Self, Snapshot) {
        let persistence = Self {
            storage,
            keys: StorageKeys::with_prefix(prefix),
        };
        let snapshot = persistence.load();
        (persistence, snapshot)
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Best-effort read. Any failure is logged and yields defaults.
    #[tracing::instrument(skip(self), fields(key = %self.keys.todos))]
    pub fn load(&self) -> Snapshot {
        match self.try_load() {
            Ok(snapshot) => {
                info!(
                    count = snapshot.tasks.len(),
                    filter = %snapshot.filter,
                    sort = %snapshot.sort,
                    "loaded persisted state"
                );
                snapshot
            }
            Err(err) => {
                error!(error = ?err, "failed loading persisted state; using defaults");
                Snapshot::default()
            }
        }
    }

    pub fn try_load(&self) -> anyhow::Result<Snapshot> {
        let tasks = match self
            .storage
            .get_item(&self.keys.todos)
            .with_context(|| format!("failed reading {}", self.keys.todos))?
        {
            Some(raw) => decode_tasks(&raw)
                .with_context(|| format!("failed decoding {}", self.keys.todos))?,
            None => Vec::new(),
        };

        let filter = self.read_setting::<Filter>(&self.keys.filter)?;
        let sort = self.read_setting::<SortMode>(&self.keys.sort)?;

        Ok(Snapshot {
            tasks,
            filter,
            sort,
        })
    }

    /// A setting that is missing or does not parse falls back to its default
    /// on its own; only a failed read is an error.
    fn read_setting<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: FromStr<Err = anyhow::Error> + Default,
    {
        let Some(raw) = self
            .storage
            .get_item(key)
            .with_context(|| format!("failed reading {key}"))?
        else {
            return Ok(T::default());
        };

        match raw.parse::<T>() {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(key, error = %err, "ignoring unrecognized stored setting");
                Ok(T::default())
            }
        }
    }

    /// Best-effort write. Returns whether every entry was written; failures
    /// are logged and leave the caller's in-memory state untouched.
    #[tracing::instrument(skip(self, tasks), fields(count = tasks.len()))]
    pub fn save(&mut self, tasks: &[Task], filter: Filter, sort: SortMode) -> bool {
        match self.try_save(tasks, filter, sort) {
            Ok(()) => {
                debug!("persisted state");
                true
            }
            Err(err) => {
                error!(error = ?err, "failed persisting state; keeping in-memory state");
                false
            }
        }
    }

    pub fn try_save(&mut self, tasks: &[Task], filter: Filter, sort: SortMode) -> anyhow::Result<()> {
        let encoded = encode_tasks(tasks)?;
        self.storage
            .set_item(&self.keys.todos, &encoded)
            .with_context(|| format!("failed writing {}", self.keys.todos))?;
        self.storage
            .set_item(&self.keys.filter, filter.as_key())
            .with_context(|| format!("failed writing {}", self.keys.filter))?;
        self.storage
            .set_item(&self.keys.sort, sort.as_key())
            .with_context(|| format!("failed writing {}", self.keys.sort))?;
        Ok(())
    }
}

pub fn encode_tasks(tasks: &[Task]) -> anyhow::Result<String> {
    serde_json::to_string(tasks).context("failed encoding task list")
}

/// Parses a stored task list and re-establishes the list invariants:
/// non-empty trimmed text and unique ids.
pub fn decode_tasks(raw: &str) -> anyhow::Result<Vec<Task>> {
    let decoded: Vec<Task> = serde_json::from_str(raw)?;
    let total = decoded.len();

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(total);
    for task in decoded {
        let id = task.id().clone();
        let Some(task) = task.normalized() else {
            warn!(id = %id, "dropping stored task with empty text");
            continue;
        };
        if !seen.insert(id.clone()) {
            warn!(id = %id, "dropping stored task with duplicate id");
            continue;
        }
        out.push(task);
    }

    debug!(total, kept = out.len(), "decoded stored tasks");
    Ok(out)
}
