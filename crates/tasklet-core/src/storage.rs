use std::collections::BTreeMap;

#[cfg(not(target_arch = "wasm32"))]
pub use self::file::FileStorage;

/// String-keyed, string-valued storage with the shape of the browser's
/// `localStorage`.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()>;

    fn remove_item(&mut self, key: &str) -> anyhow::Result<()>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> anyhow::Result<()> {
        (**self).remove_item(key)
    }
}

/// Process-local storage. Nothing survives the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> anyhow::Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::collections::BTreeMap;
    use std::fs;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use anyhow::{Context, anyhow};
    use tempfile::NamedTempFile;
    use tracing::{debug, info};

    use super::KeyValueStorage;

    /// All keys in one JSON object file, rewritten atomically on every
    /// change.
    #[derive(Debug)]
    pub struct FileStorage {
        path: PathBuf,
        items: BTreeMap<String, String>,
    }

    impl FileStorage {
        #[tracing::instrument(skip(path))]
        pub fn open(path: &Path) -> anyhow::Result<Self> {
            let path = path.to_path_buf();
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create {}", dir.display()))?;
            }

            let items = if path.exists() {
                let raw = fs::read_to_string(&path)
                    .with_context(|| format!("failed reading {}", path.display()))?;
                if raw.trim().is_empty() {
                    BTreeMap::new()
                } else {
                    serde_json::from_str(&raw)
                        .with_context(|| format!("failed parsing {}", path.display()))?
                }
            } else {
                BTreeMap::new()
            };

            info!(file = %path.display(), keys = items.len(), "opened file storage");
            Ok(Self { path, items })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        #[tracing::instrument(skip(self), fields(file = %self.path.display()))]
        fn flush(&self) -> anyhow::Result<()> {
            debug!(keys = self.items.len(), "writing file storage atomically");

            let dir = self
                .path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let mut temp = NamedTempFile::new_in(dir)?;
            let serialized = serde_json::to_string_pretty(&self.items)?;
            temp.write_all(serialized.as_bytes())?;
            temp.flush()?;

            temp.persist(&self.path)
                .map_err(|err| anyhow!("failed to persist {}: {}", self.path.display(), err))?;
            Ok(())
        }

        fn apply(&mut self, key: &str, value: Option<String>) -> anyhow::Result<()> {
            let previous = match value {
                Some(value) => self.items.insert(key.to_string(), value),
                None => self.items.remove(key),
            };

            if let Err(err) = self.flush() {
                // the file still holds the old value, so the map must too
                match previous {
                    Some(old) => self.items.insert(key.to_string(), old),
                    None => self.items.remove(key),
                };
                return Err(err);
            }
            Ok(())
        }
    }

    impl KeyValueStorage for FileStorage {
        fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
            Ok(self.items.get(key).cloned())
        }

        fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
            self.apply(key, Some(value.to_string()))
        }

        fn remove_item(&mut self, key: &str) -> anyhow::Result<()> {
            if !self.items.contains_key(key) {
                return Ok(());
            }
            self.apply(key, None)
        }
    }
}
