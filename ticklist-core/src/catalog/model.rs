//! Record types held by the catalog

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque record identifier.
///
/// Identifiers are assigned by the catalog and rendered as decimal strings,
/// but callers must treat them as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Wrap a raw identifier string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric value of the id, if it is a plain decimal number
    pub(crate) fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TodoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for TodoId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Completion state of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    Pending,
    Completed,
}

impl TodoStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TodoStatus::Completed)
    }
}

/// A single TODO record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
}

impl TodoItem {
    /// Create a pending record
    pub fn new(id: impl Into<TodoId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed: false,
        }
    }

    /// Mark the record as completed at construction time (used for seeding)
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn status(&self) -> TodoStatus {
        if self.completed {
            TodoStatus::Completed
        } else {
            TodoStatus::Pending
        }
    }
}

/// Outcome of a complete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The record moved from pending to completed
    Completed(TodoItem),
    /// The record was already completed; nothing changed
    AlreadyCompleted(TodoItem),
}

impl Completion {
    pub fn item(&self) -> &TodoItem {
        match self {
            Completion::Completed(item) | Completion::AlreadyCompleted(item) => item,
        }
    }

    pub fn was_already_completed(&self) -> bool {
        matches!(self, Completion::AlreadyCompleted(_))
    }
}
