use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status column a task lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Todo,
    InProgress,
    Completed,
}

impl Status {
    /// Column display order, left to right
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Completed];

    /// Column header label
    pub fn label(self) -> &'static str {
        match self {
            Status::Todo => "To Do",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
        }
    }

    /// The serialized form, also used in prompts
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::Completed => "completed",
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Todo
    }
}

/// Task priority class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    /// High and urgent tasks count as high-priority for filtering
    pub fn is_high(self) -> bool {
        matches!(self, Priority::High | Priority::Urgent)
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// A task record. Serialized field names match the on-disk store shape,
/// so this struct is the persistence contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique id, stable for the record's lifetime
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    /// Optional due date, canonically `YYYY-MM-DD`
    #[serde(default)]
    pub due_date: Option<String>,
    /// Kept in sync with `status` by `set_status`; never set directly
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Set the status column and reconcile the `completed` flag.
    /// This is the only way status or completed should change.
    pub fn set_status(&mut self, status: Status) {
        self.status = status;
        self.completed = status == Status::Completed;
    }

    /// Flip completion: incomplete tasks jump to Completed, completed
    /// tasks fall back to Todo.
    pub fn toggle_completion(&mut self) {
        if self.completed {
            self.set_status(Status::Todo);
        } else {
            self.set_status(Status::Completed);
        }
    }
}

/// Fields for a new task. The model accepts drafts as-is; title emptiness
/// is checked at the form layer (`ops::validate`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// Defaults to Todo when unset
    pub status: Option<Status>,
    pub due_date: Option<String>,
}

/// A partial update merged over an existing task by id.
/// `due_date` uses a double Option: outer `None` leaves the field
/// untouched, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub due_date: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(status: Status) -> Task {
        let now = Utc::now();
        Task {
            id: "t1".into(),
            title: "A task".into(),
            description: String::new(),
            priority: Priority::default(),
            status,
            due_date: None,
            completed: status == Status::Completed,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn set_status_reconciles_completed() {
        let mut t = task(Status::Todo);
        t.set_status(Status::Completed);
        assert!(t.completed);
        t.set_status(Status::InProgress);
        assert!(!t.completed);
    }

    #[test]
    fn toggle_round_trips_through_todo() {
        let mut t = task(Status::Todo);
        t.toggle_completion();
        assert_eq!(t.status, Status::Completed);
        assert!(t.completed);
        t.toggle_completion();
        assert_eq!(t.status, Status::Todo);
        assert!(!t.completed);
    }

    #[test]
    fn serde_shape_matches_store_contract() {
        let mut t = task(Status::Todo);
        t.due_date = Some("2024-01-20".into());
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["status"], "todo");
        assert_eq!(json["dueDate"], "2024-01-20");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn status_enum_round_trips_kebab_case() {
        let s: Status = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(s, Status::InProgress);
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"in-progress\"");
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let t: Task = serde_json::from_str(
            r#"{"id":"x","title":"Bare","createdAt":"2024-01-15T10:00:00Z","updatedAt":"2024-01-15T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(t.priority, Priority::Medium);
        assert_eq!(t.status, Status::Todo);
        assert!(t.due_date.is_none());
        assert!(!t.completed);
    }
}
