use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::datetime::iso_date_serde;

/// Opaque task identifier. Stored as a plain string so ids written by older
/// builds (e.g. millisecond timestamps) keep round-tripping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,

    text: String,

    #[serde(default)]
    completed: bool,

    #[serde(with = "iso_date_serde")]
    created_at: DateTime<Utc>,
}

impl Task {
    /// Builds a fresh, uncompleted task. Returns `None` when `text` is blank.
    ///
    /// The creation time is truncated to milliseconds, the precision the
    /// persisted form keeps.
    pub fn new(text: &str, now: DateTime<Utc>) -> Option<Self> {
        let text = normalize_text(text)?;
        Some(Self {
            id: TaskId::generate(),
            text,
            completed: false,
            created_at: now.trunc_subsecs(3),
        })
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }

    pub(crate) fn with_text(&self, text: String) -> Self {
        Self {
            text,
            ..self.clone()
        }
    }

    /// Re-applies the text invariant to a rehydrated record.
    pub(crate) fn normalized(self) -> Option<Self> {
        let text = normalize_text(&self.text)?;
        Some(Self { text, ..self })
    }
}

/// Trims `raw` and rejects it when nothing is left.
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
