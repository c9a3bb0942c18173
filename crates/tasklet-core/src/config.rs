use anyhow::Context;
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{
  debug,
  error,
  info,
  warn
};

use crate::persistence::DEFAULT_PREFIX;

const DEFAULT_TITLE: &str = "Tasks";
const DEFAULT_PLACEHOLDER: &str =
  "Add a new task...";
const DEFAULT_EMPTY_MESSAGE: &str =
  "No tasks found";

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct AppConfig {
  pub title:   String,
  pub storage: StorageConfig,
  pub display: DisplayConfig,
  pub form:    FormConfig,
  pub list:    ListConfig
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct StorageConfig {
  pub prefix: String
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Default,
  Deserialize,
)]
#[serde(default)]
pub struct DisplayConfig {
  pub timezone: Option<String>
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct FormConfig {
  pub placeholder: String
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct ListConfig {
  pub empty_message: String
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      title:   DEFAULT_TITLE.to_string(),
      storage: StorageConfig::default(),
      display: DisplayConfig::default(),
      form:    FormConfig::default(),
      list:    ListConfig::default()
    }
  }
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      prefix: DEFAULT_PREFIX.to_string()
    }
  }
}

impl Default for FormConfig {
  fn default() -> Self {
    Self {
      placeholder: DEFAULT_PLACEHOLDER
        .to_string()
    }
  }
}

impl Default for ListConfig {
  fn default() -> Self {
    Self {
      empty_message:
        DEFAULT_EMPTY_MESSAGE.to_string()
    }
  }
}

impl AppConfig {
  /// Strict parse. Blank strings are
  /// replaced with their defaults.
  pub fn from_toml_str(
    raw: &str
  ) -> anyhow::Result<Self> {
    let cfg = toml::from_str::<AppConfig>(
      raw
    )
    .context(
      "failed to parse tasklet config"
    )?;
    Ok(cfg.normalized())
  }

  /// Lenient parse for embedded config:
  /// never fails, logs what it could
  /// not use.
  #[tracing::instrument(skip(raw))]
  pub fn load_or_default(
    raw: &str
  ) -> Self {
    match Self::from_toml_str(raw) {
      | Ok(cfg) => {
        info!(
          title = %cfg.title,
          prefix = %cfg.storage.prefix,
          timezone = ?cfg.display.timezone,
          "loaded tasklet config"
        );
        cfg
      }
      | Err(error) => {
        error!(
          error = ?error,
          "failed to parse tasklet \
           config; using defaults"
        );
        Self::default()
      }
    }
  }

  /// Display timezone for creation
  /// labels. `None` means the host's
  /// local zone; unknown names log and
  /// fall back to it as well.
  pub fn timezone(&self) -> Option<Tz> {
    let raw = self
      .display
      .timezone
      .as_deref()
      .map(str::trim)
      .filter(|raw| !raw.is_empty())?;

    match raw.parse::<Tz>() {
      | Ok(tz) => Some(tz),
      | Err(error) => {
        warn!(
          timezone = raw,
          %error,
          "unknown display timezone; \
           using local time"
        );
        None
      }
    }
  }

  fn normalized(mut self) -> Self {
    if self.title.trim().is_empty() {
      debug!("blank title; using default");
      self.title =
        DEFAULT_TITLE.to_string();
    }
    if self.storage.prefix.trim().is_empty()
    {
      warn!(
        "blank storage prefix; using \
         default"
      );
      self.storage.prefix =
        DEFAULT_PREFIX.to_string();
    }
    if self.form.placeholder.is_empty() {
      self.form.placeholder =
        DEFAULT_PLACEHOLDER.to_string();
    }
    if self
      .list
      .empty_message
      .trim()
      .is_empty()
    {
      self.list.empty_message =
        DEFAULT_EMPTY_MESSAGE.to_string();
    }
    self
  }
}
