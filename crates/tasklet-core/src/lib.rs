pub mod config;
pub mod datetime;
pub mod filter;
pub mod persistence;
pub mod storage;
pub mod store;
pub mod task;
pub mod view;

pub use config::AppConfig;
pub use filter::{
  Filter,
  SortMode
};
pub use persistence::{
  DEFAULT_PREFIX,
  Persistence,
  Snapshot
};
pub use storage::{
  KeyValueStorage,
  MemoryStorage
};
pub use store::{
  StoreChange,
  SubscriptionId,
  TaskStore
};
pub use task::{
  Task,
  TaskId
};
