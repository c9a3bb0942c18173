use anyhow::anyhow;
use tasklet_core::storage::{
  KeyValueStorage,
  MemoryStorage
};

/// `window.localStorage` behind the
/// store's storage trait.
pub struct LocalStorage {
  inner: web_sys::Storage
}

impl LocalStorage {
  pub fn open() -> anyhow::Result<Self>
  {
    let window = web_sys::window()
      .ok_or_else(|| {
        anyhow!("no window available")
      })?;
    let inner = window
      .local_storage()
      .map_err(|err| {
        anyhow!(
          "localStorage access denied: \
           {err:?}"
        )
      })?
      .ok_or_else(|| {
        anyhow!(
          "localStorage unavailable"
        )
      })?;
    Ok(Self { inner })
  }
}

impl KeyValueStorage for LocalStorage {
  fn get_item(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    self.inner.get_item(key).map_err(
      |err| {
        anyhow!(
          "failed reading {key}: {err:?}"
        )
      }
    )
  }

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    self
      .inner
      .set_item(key, value)
      .map_err(|err| {
        anyhow!(
          "failed writing {key}: {err:?}"
        )
      })
  }

  fn remove_item(
    &mut self,
    key: &str
  ) -> anyhow::Result<()> {
    self.inner.remove_item(key).map_err(
      |err| {
        anyhow!(
          "failed removing {key}: \
           {err:?}"
        )
      }
    )
  }
}

/// Browser storage when the page may
/// use it, otherwise an in-memory map
/// so the session still works.
pub fn open_browser_storage()
-> Box<dyn KeyValueStorage> {
  match LocalStorage::open() {
    | Ok(storage) => Box::new(storage),
    | Err(error) => {
      tracing::warn!(
        error = ?error,
        "localStorage unavailable; \
         tasks will not survive a \
         reload"
      );
      Box::new(MemoryStorage::new())
    }
  }
}
