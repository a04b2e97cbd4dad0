use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Content written over a todo when it is deleted. Deleted records stay in storage.
pub const DELETED_CONTENT: &str = "This todo has been deleted";

/// Deadline assigned when a new todo does not carry one
pub fn default_deadline(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(7)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub username: String,
    /// Per-user sequence number assigned at creation
    pub index: usize,
    pub content: String,
    pub done: bool,
    pub deadline: DateTime<Utc>,
}

impl Todo {
    pub fn mark_deleted(&mut self) {
        self.content = DELETED_CONTENT.to_string();
        self.done = true;
    }

    pub fn is_owned_by(&self, username: &str) -> bool {
        self.username == username
    }

    /// Deadline in the textual form used for display and `deadline` filtering
    pub fn deadline_string(&self) -> String {
        self.deadline.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn view(&self, index: usize) -> TodoView {
        TodoView {
            index,
            content: self.content.clone(),
            done: self.done,
            deadline: self.deadline_string(),
        }
    }
}

/// What clients see of a todo. `index` is the position the record was addressed by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoView {
    pub index: usize,
    pub content: String,
    pub done: bool,
    pub deadline: String,
}
