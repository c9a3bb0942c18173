use anyhow::anyhow;
use chrono::{Duration, TimeZone, Timelike, Utc};
use tasklet_core::filter::{Filter, SortMode};
use tasklet_core::persistence::{DEFAULT_PREFIX, Persistence, Snapshot};
use tasklet_core::storage::{FileStorage, KeyValueStorage, MemoryStorage};
use tasklet_core::store::TaskStore;
use tasklet_core::task::Task;
use tempfile::tempdir;

/// Reads succeed; every write fails, like a full browser quota.
#[derive(Debug, Default)]
struct QuotaExceeded {
    inner: MemoryStorage,
}

impl KeyValueStorage for QuotaExceeded {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&mut self, key: &str, _value: &str) -> anyhow::Result<()> {
        Err(anyhow!("quota exceeded writing {key}"))
    }

    fn remove_item(&mut self, key: &str) -> anyhow::Result<()> {
        self.inner.remove_item(key)
    }
}

#[test]
fn save_then_load_reproduces_list_and_settings() {
    let now = Utc
        .with_ymd_and_hms(2026, 2, 17, 12, 0, 0)
        .single()
        .expect("valid now")
        .with_nanosecond(987_654_321)
        .expect("valid nanos");
    let tasks = vec![
        Task::new("Buy milk", now).expect("task"),
        Task::new("Walk dog", now + Duration::seconds(3)).expect("task"),
    ];

    let (mut persistence, _) = Persistence::open(MemoryStorage::new(), DEFAULT_PREFIX);
    assert!(persistence.save(&tasks, Filter::Active, SortMode::Date));

    let reloaded = persistence.load();
    assert_eq!(
        reloaded,
        Snapshot {
            tasks: tasks.clone(),
            filter: Filter::Active,
            sort: SortMode::Date,
        }
    );
    assert_eq!(reloaded.tasks[0].created_at().nanosecond(), 987_000_000);
}

#[test]
fn store_state_survives_a_restart_on_disk() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("local-storage.json");

    let (milk, expected) = {
        let storage = FileStorage::open(&path).expect("open storage");
        let mut store = TaskStore::open(storage, DEFAULT_PREFIX);
        let milk = store.add_task("Buy milk").expect("added");
        store.add_task("Walk dog").expect("added");
        store.toggle_task(&milk);
        store.edit_task(&milk, "Buy oat milk");
        store.set_filter(Filter::Completed);
        (milk, store.tasks().to_vec())
    };

    let storage = FileStorage::open(&path).expect("reopen storage");
    let store = TaskStore::open(storage, DEFAULT_PREFIX);
    assert_eq!(store.tasks(), expected.as_slice());
    assert_eq!(store.filter(), Filter::Completed);
    assert_eq!(store.sort(), SortMode::Date);

    let view = store.derived_view();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].id(), &milk);
    assert_eq!(view[0].text(), "Buy oat milk");
}

#[test]
fn corrupted_task_entry_loads_defaults() {
    let mut storage = MemoryStorage::new();
    storage
        .set_item("todo-app-todos", "{not json")
        .expect("seed");
    storage.set_item("todo-app-filter", "completed").expect("seed");
    storage.set_item("todo-app-sort", "date").expect("seed");

    let store = TaskStore::open(storage, DEFAULT_PREFIX);
    assert!(store.tasks().is_empty());
    assert_eq!(store.filter(), Filter::All);
    assert_eq!(store.sort(), SortMode::Date);
}

#[test]
fn bad_filter_setting_does_not_cost_the_task_list() {
    let mut storage = MemoryStorage::new();
    storage
        .set_item(
            "todo-app-todos",
            r#"[{"id":"1","text":"keep","completed":false,"createdAt":"2026-02-17T12:00:00.000Z"}]"#,
        )
        .expect("seed");
    storage.set_item("todo-app-filter", "Active").expect("seed");

    let mut store = TaskStore::open(storage, DEFAULT_PREFIX);
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.filter(), Filter::All);

    assert!(store.set_filter(Filter::Active));
    let persisted = store
        .storage()
        .get_item("todo-app-todos")
        .expect("get")
        .expect("todos written");
    let value: serde_json::Value = serde_json::from_str(&persisted).expect("json");
    assert_eq!(value[0]["id"], "1");
    assert_eq!(value[0]["text"], "keep");
    assert_eq!(
        store.storage().get_item("todo-app-filter").expect("get").as_deref(),
        Some("active")
    );
}

#[test]
fn bad_timestamp_counts_as_corruption() {
    let mut storage = MemoryStorage::new();
    storage
        .set_item(
            "todo-app-todos",
            r#"[{"id":"1","text":"a","completed":false,"createdAt":"not a date"}]"#,
        )
        .expect("seed");

    let (_, snapshot) = Persistence::open(storage, DEFAULT_PREFIX);
    assert_eq!(snapshot, Snapshot::default());
}

#[test]
fn legacy_records_load() {
    let mut storage = MemoryStorage::new();
    storage
        .set_item(
            "todo-app-todos",
            r#"[
                {"id":"1739790000000","text":"Buy milk","completed":true,"createdAt":"2026-02-17T11:00:00.000Z"},
                {"id":"1739793600000","text":"Walk dog","completed":false,"createdAt":"2026-02-17T12:00:00.000Z"}
            ]"#,
        )
        .expect("seed");

    let mut store = TaskStore::open(storage, DEFAULT_PREFIX);
    assert_eq!(store.tasks().len(), 2);
    assert_eq!(store.filter(), Filter::All);

    let texts: Vec<&str> = store.tasks().iter().map(Task::text).collect();
    assert_eq!(texts, ["Buy milk", "Walk dog"]);

    let view = store.derived_view();
    assert_eq!(view[0].id().as_str(), "1739793600000");

    let legacy = view[1].id().clone();
    assert!(store.toggle_task(&legacy));
    assert!(!store.get(&legacy).expect("present").is_completed());
}

#[test]
fn write_failures_keep_the_session_going() {
    let mut store = TaskStore::open(QuotaExceeded::default(), DEFAULT_PREFIX);

    let id = store.add_task("still works").expect("added in memory");
    assert!(store.toggle_task(&id));
    assert!(store.set_filter(Filter::Completed));

    assert_eq!(store.derived_view().len(), 1);
    assert_eq!(store.revision(), 3);
    assert!(store.storage().inner.is_empty());
}

#[test]
fn opening_never_overwrites_existing_state() {
    let mut storage = MemoryStorage::new();
    let raw = r#"[{"id":"1","text":"keep","completed":false,"createdAt":"2026-02-17T12:00:00.000Z"}]"#;
    storage.set_item("todo-app-todos", raw).expect("seed");

    let store = TaskStore::open(storage, DEFAULT_PREFIX);
    assert_eq!(
        store.storage().get_item("todo-app-todos").expect("get").as_deref(),
        Some(raw)
    );
}
