//! Framework-free state behind the task list screen: the creation form, the
//! per-row edit buffer and the filter buttons.

use crate::filter::Filter;
use crate::task::{Task, normalize_text};

/// Creation form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    text: String,
}

impl TaskForm {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Drives the submit button's enabled state.
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn shows_clear(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Yields the trimmed text and empties the input, or leaves the input
    /// alone when there is nothing to add.
    pub fn submit(&mut self) -> Option<String> {
        let text = normalize_text(&self.text)?;
        self.text.clear();
        Some(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Commit,
    Cancel,
}

impl EditKey {
    /// Maps a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Enter" => Some(EditKey::Commit),
            "Escape" => Some(EditKey::Cancel),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Ignored,
    Committed(String),
    /// Commit attempted with blank text; still editing.
    Rejected,
    Cancelled,
}

/// One row's edit buffer.
///
/// The buffer is seeded from the task text when editing begins and is never
/// touched by later changes to the task until the session ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    buffer: Option<String>,
}

impl EditSession {
    pub fn is_editing(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn buffer(&self) -> Option<&str> {
        self.buffer.as_deref()
    }

    /// Completed tasks cannot be edited.
    pub fn can_begin(task: &Task) -> bool {
        !task.is_completed()
    }

    pub fn begin(&mut self, task: &Task) -> bool {
        if !Self::can_begin(task) {
            return false;
        }
        self.buffer = Some(task.text().to_string());
        true
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        if let Some(buffer) = self.buffer.as_mut() {
            *buffer = text.into();
        }
    }

    pub fn is_valid(&self) -> bool {
        self.buffer
            .as_deref()
            .is_some_and(|buffer| !buffer.trim().is_empty())
    }

    pub fn commit(&mut self) -> EditOutcome {
        let Some(buffer) = self.buffer.as_deref() else {
            return EditOutcome::Ignored;
        };
        match normalize_text(buffer) {
            Some(text) => {
                self.buffer = None;
                EditOutcome::Committed(text)
            }
            None => EditOutcome::Rejected,
        }
    }

    pub fn cancel(&mut self) -> EditOutcome {
        if self.buffer.take().is_some() {
            EditOutcome::Cancelled
        } else {
            EditOutcome::Ignored
        }
    }

    pub fn handle_key(&mut self, key: &str) -> EditOutcome {
        match EditKey::from_key(key) {
            Some(EditKey::Commit) => self.commit(),
            Some(EditKey::Cancel) => self.cancel(),
            None => EditOutcome::Ignored,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterButton {
    pub filter: Filter,
    pub label: &'static str,
    pub active: bool,
}

pub fn filter_buttons(active: Filter) -> Vec<FilterButton> {
    Filter::ALL
        .into_iter()
        .map(|filter| FilterButton {
            filter,
            label: filter.label(),
            active: filter == active,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{EditKey, EditOutcome, EditSession, TaskForm, filter_buttons};
    use crate::filter::Filter;
    use crate::task::Task;

    #[test]
    fn form_submits_trimmed_text_and_resets() {
        let mut form = TaskForm::default();
        assert!(!form.is_valid());
        assert!(!form.shows_clear());

        form.set_text("  Walk dog ");
        assert!(form.is_valid());
        assert!(form.shows_clear());
        assert_eq!(form.submit().as_deref(), Some("Walk dog"));
        assert_eq!(form.text(), "");
    }

    #[test]
    fn blank_form_keeps_its_input() {
        let mut form = TaskForm::default();
        form.set_text("   ");
        assert!(!form.is_valid());
        assert!(form.shows_clear());
        assert_eq!(form.submit(), None);
        assert_eq!(form.text(), "   ");

        form.clear();
        assert!(!form.shows_clear());
    }

    #[test]
    fn edit_keys() {
        assert_eq!(EditKey::from_key("Enter"), Some(EditKey::Commit));
        assert_eq!(EditKey::from_key("Escape"), Some(EditKey::Cancel));
        assert_eq!(EditKey::from_key("a"), None);
    }

    #[test]
    fn edit_commit_and_cancel() {
        let task = Task::new("Buy milk", Utc::now()).expect("task");
        let mut session = EditSession::default();

        assert!(session.begin(&task));
        assert_eq!(session.buffer(), Some("Buy milk"));
        session.set_text("  Buy oat milk ");
        assert_eq!(
            session.handle_key("Enter"),
            EditOutcome::Committed("Buy oat milk".to_string())
        );
        assert!(!session.is_editing());

        assert!(session.begin(&task));
        session.set_text("something else");
        assert_eq!(session.handle_key("Escape"), EditOutcome::Cancelled);
        assert_eq!(session.buffer(), None);

        assert!(session.begin(&task));
        assert_eq!(session.buffer(), Some("Buy milk"), "cancel reverts to task text");
    }

    #[test]
    fn blank_commit_stays_in_edit_mode() {
        let task = Task::new("keep", Utc::now()).expect("task");
        let mut session = EditSession::default();
        session.begin(&task);
        session.set_text("   ");

        assert!(!session.is_valid());
        assert_eq!(session.commit(), EditOutcome::Rejected);
        assert!(session.is_editing());
    }

    #[test]
    fn idle_session_ignores_input() {
        let mut session = EditSession::default();
        session.set_text("ignored");
        assert_eq!(session.buffer(), None);
        assert_eq!(session.handle_key("Enter"), EditOutcome::Ignored);
        assert_eq!(session.cancel(), EditOutcome::Ignored);
        assert_eq!(session.handle_key("Tab"), EditOutcome::Ignored);
    }

    #[test]
    fn completed_tasks_are_not_editable() {
        let task = Task::new("done", Utc::now()).expect("task").toggled();
        let mut session = EditSession::default();
        assert!(!EditSession::can_begin(&task));
        assert!(!session.begin(&task));
        assert!(!session.is_editing());
    }

    #[test]
    fn one_button_per_filter_with_single_highlight() {
        let buttons = filter_buttons(Filter::Active);
        let labels: Vec<&str> = buttons.iter().map(|button| button.label).collect();
        assert_eq!(labels, ["All", "Active", "Completed"]);

        let active: Vec<Filter> = buttons
            .iter()
            .filter(|button| button.active)
            .map(|button| button.filter)
            .collect();
        assert_eq!(active, [Filter::Active]);
    }
}
