use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::io::store::Store;
use crate::model::sample::sample_tasks;
use crate::model::task::{Status, Task, TaskDraft, TaskPatch};

/// Quick-filter tag narrowing the visible task set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterTag {
    All,
    Today,
    /// Due tomorrow only. A fixed one-day lookahead, narrower than the
    /// name suggests; kept deliberately.
    Upcoming,
    HighPriority,
}

impl FilterTag {
    pub const ALL: [FilterTag; 4] = [
        FilterTag::All,
        FilterTag::Today,
        FilterTag::Upcoming,
        FilterTag::HighPriority,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterTag::All => "All",
            FilterTag::Today => "Today",
            FilterTag::Upcoming => "Upcoming",
            FilterTag::HighPriority => "High Priority",
        }
    }
}

impl Default for FilterTag {
    fn default() -> Self {
        FilterTag::All
    }
}

/// Persisted color scheme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    Light,
    Dark,
}

impl ThemeChoice {
    pub fn toggled(self) -> Self {
        match self {
            ThemeChoice::Light => ThemeChoice::Dark,
            ThemeChoice::Dark => ThemeChoice::Light,
        }
    }
}

impl Default for ThemeChoice {
    fn default() -> Self {
        ThemeChoice::Light
    }
}

/// The whole session state: the authoritative task collection plus the
/// active view narrowing and theme preference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    /// Insertion order is the source of truth for relative positions
    pub tasks: Vec<Task>,
    pub filter: FilterTag,
    pub search_query: String,
    pub theme: ThemeChoice,
}

impl BoardState {
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }
}

/// Every mutation goes through one of these
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(TaskDraft),
    Update(TaskPatch),
    Delete(String),
    ToggleCompletion(String),
    MoveToStatus { id: String, status: Status },
    Reorder { active_id: String, over_id: String },
    SetFilter(FilterTag),
    SetSearch(String),
    SetTheme(ThemeChoice),
    /// Hydration: replace the whole collection
    LoadTasks(Vec<Task>),
}

impl Command {
    /// Whether this command can change the task collection (and so needs
    /// a store write afterwards)
    fn touches_tasks(&self) -> bool {
        !matches!(
            self,
            Command::SetFilter(_) | Command::SetSearch(_) | Command::SetTheme(_)
        )
    }
}

/// The single transition function. Total over the current collection:
/// mutations aimed at a missing id are silent no-ops.
pub fn apply(state: &mut BoardState, command: Command) {
    match command {
        Command::Add(draft) => {
            let now = Utc::now();
            state.tasks.push(Task {
                id: Uuid::new_v4().to_string(),
                title: draft.title,
                description: draft.description,
                priority: draft.priority,
                status: draft.status.unwrap_or_default(),
                due_date: draft.due_date,
                completed: draft.status == Some(Status::Completed),
                created_at: now,
                updated_at: now,
            });
        }
        Command::Update(patch) => {
            if let Some(task) = state.task_mut(&patch.id) {
                if let Some(title) = patch.title {
                    task.title = title;
                }
                if let Some(description) = patch.description {
                    task.description = description;
                }
                if let Some(priority) = patch.priority {
                    task.priority = priority;
                }
                if let Some(status) = patch.status {
                    task.set_status(status);
                }
                if let Some(due_date) = patch.due_date {
                    task.due_date = due_date;
                }
                task.updated_at = Utc::now();
            }
        }
        Command::Delete(id) => {
            state.tasks.retain(|t| t.id != id);
        }
        Command::ToggleCompletion(id) => {
            if let Some(task) = state.task_mut(&id) {
                task.toggle_completion();
                task.updated_at = Utc::now();
            }
        }
        Command::MoveToStatus { id, status } => {
            if let Some(task) = state.task_mut(&id) {
                task.set_status(status);
                task.updated_at = Utc::now();
            }
        }
        Command::Reorder { active_id, over_id } => {
            reorder(state, &active_id, &over_id);
        }
        Command::SetFilter(filter) => state.filter = filter,
        Command::SetSearch(query) => state.search_query = query,
        Command::SetTheme(theme) => state.theme = theme,
        Command::LoadTasks(tasks) => state.tasks = tasks,
    }
}

/// Guarded same-column splice. No-op on a self-drop, a missing id, or a
/// cross-status pair (a cross-status drop is a move, not a reorder, and
/// the drop coordinator resolves it before it gets here).
fn reorder(state: &mut BoardState, active_id: &str, over_id: &str) {
    if active_id == over_id {
        return;
    }
    let from = state.tasks.iter().position(|t| t.id == active_id);
    let to = state.tasks.iter().position(|t| t.id == over_id);
    let (Some(from), Some(to)) = (from, to) else {
        return;
    };
    if state.tasks[from].status != state.tasks[to].status {
        return;
    }
    let moved = state.tasks.remove(from);
    state.tasks.insert(to, moved);
}

/// Owns the session state and an injected store handle; every dispatch
/// applies the transition and re-serializes the affected keys.
pub struct Board {
    state: BoardState,
    store: Store,
    revision: u64,
}

impl Board {
    /// Hydrate from the store, seeding the fixed sample set only when
    /// the tasks key is missing or unreadable. A persisted empty list is
    /// a real state (the user deleted everything) and stays empty.
    pub fn open(store: Store) -> Self {
        let mut state = BoardState::default();
        let tasks = match store.load_tasks() {
            Some(tasks) => tasks,
            None => {
                let seeded = sample_tasks();
                let _ = store.save_tasks(&seeded);
                seeded
            }
        };
        apply(&mut state, Command::LoadTasks(tasks));
        if let Some(theme) = store.load_theme() {
            apply(&mut state, Command::SetTheme(theme));
        }
        Board {
            state,
            store,
            revision: 0,
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Bumped on every dispatch; the render loop redraws when it moves
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply a command and persist. Store writes are last-writer-wins;
    /// a failed write loses at most this one change.
    pub fn dispatch(&mut self, command: Command) {
        let touches_tasks = command.touches_tasks();
        let touches_theme = matches!(command, Command::SetTheme(_));
        apply(&mut self.state, command);
        self.revision += 1;
        if touches_tasks {
            let _ = self.store.save_tasks(&self.state.tasks);
        }
        if touches_theme {
            let _ = self.store.save_theme(self.state.theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Priority;
    use pretty_assertions::assert_eq;

    fn draft(title: &str, status: Status) -> TaskDraft {
        TaskDraft {
            title: title.into(),
            status: Some(status),
            ..Default::default()
        }
    }

    fn state_with(drafts: &[(&str, Status)]) -> BoardState {
        let mut state = BoardState::default();
        for (title, status) in drafts {
            apply(&mut state, Command::Add(draft(title, *status)));
        }
        state
    }

    fn id_at(state: &BoardState, index: usize) -> String {
        state.tasks[index].id.clone()
    }

    #[test]
    fn add_appends_with_fresh_unique_ids() {
        let mut state = BoardState::default();
        apply(&mut state, Command::Add(draft("Same", Status::Todo)));
        apply(&mut state, Command::Add(draft("Same", Status::Todo)));
        assert_eq!(state.tasks.len(), 2);
        assert_ne!(state.tasks[0].id, state.tasks[1].id);
        assert_eq!(state.tasks[0].created_at, state.tasks[0].updated_at);
    }

    #[test]
    fn add_defaults_status_to_todo() {
        let mut state = BoardState::default();
        apply(
            &mut state,
            Command::Add(TaskDraft {
                title: "No status".into(),
                ..Default::default()
            }),
        );
        assert_eq!(state.tasks[0].status, Status::Todo);
        assert!(!state.tasks[0].completed);
    }

    #[test]
    fn add_accepts_blank_title() {
        // Title emptiness is the form layer's concern, not the model's
        let mut state = BoardState::default();
        apply(&mut state, Command::Add(TaskDraft::default()));
        assert_eq!(state.tasks.len(), 1);
        assert_eq!(state.tasks[0].title, "");
    }

    #[test]
    fn update_merges_patch_and_refreshes_updated_at() {
        let mut state = state_with(&[("Original", Status::Todo)]);
        let id = id_at(&state, 0);
        let created = state.tasks[0].created_at;
        apply(
            &mut state,
            Command::Update(TaskPatch {
                id: id.clone(),
                title: Some("Renamed".into()),
                priority: Some(Priority::Urgent),
                due_date: Some(Some("2024-06-01".into())),
                ..Default::default()
            }),
        );
        let task = state.task(&id).unwrap();
        assert_eq!(task.title, "Renamed");
        assert_eq!(task.priority, Priority::Urgent);
        assert_eq!(task.due_date.as_deref(), Some("2024-06-01"));
        assert_eq!(task.created_at, created);
        assert!(task.updated_at >= created);
    }

    #[test]
    fn update_with_status_reconciles_completed() {
        let mut state = state_with(&[("T", Status::Todo)]);
        let id = id_at(&state, 0);
        apply(
            &mut state,
            Command::Update(TaskPatch {
                id: id.clone(),
                status: Some(Status::Completed),
                ..Default::default()
            }),
        );
        assert!(state.task(&id).unwrap().completed);
    }

    #[test]
    fn update_clears_due_date_with_inner_none() {
        let mut state = BoardState::default();
        apply(
            &mut state,
            Command::Add(TaskDraft {
                title: "Dated".into(),
                due_date: Some("2024-01-20".into()),
                ..Default::default()
            }),
        );
        let id = id_at(&state, 0);
        apply(
            &mut state,
            Command::Update(TaskPatch {
                id: id.clone(),
                due_date: Some(None),
                ..Default::default()
            }),
        );
        assert!(state.task(&id).unwrap().due_date.is_none());
    }

    #[test]
    fn update_unknown_id_is_silent_noop() {
        let mut state = state_with(&[("T", Status::Todo)]);
        let before = state.clone();
        apply(
            &mut state,
            Command::Update(TaskPatch {
                id: "missing".into(),
                title: Some("Ghost".into()),
                ..Default::default()
            }),
        );
        assert_eq!(state, before);
    }

    #[test]
    fn delete_is_idempotent() {
        let mut state = state_with(&[("Keep", Status::Todo)]);
        let before = state.clone();
        apply(&mut state, Command::Delete("missing".into()));
        assert_eq!(state, before);

        let id = id_at(&state, 0);
        apply(&mut state, Command::Delete(id.clone()));
        assert!(state.tasks.is_empty());
        apply(&mut state, Command::Delete(id));
        assert!(state.tasks.is_empty());
    }

    #[test]
    fn toggle_and_move_keep_completed_in_sync() {
        let mut state = state_with(&[("T", Status::Todo)]);
        let id = id_at(&state, 0);

        apply(&mut state, Command::ToggleCompletion(id.clone()));
        let t = state.task(&id).unwrap();
        assert_eq!(t.status, Status::Completed);
        assert!(t.completed);

        apply(&mut state, Command::ToggleCompletion(id.clone()));
        let t = state.task(&id).unwrap();
        assert_eq!(t.status, Status::Todo);
        assert!(!t.completed);

        apply(
            &mut state,
            Command::MoveToStatus {
                id: id.clone(),
                status: Status::InProgress,
            },
        );
        let t = state.task(&id).unwrap();
        assert_eq!(t.status, Status::InProgress);
        assert!(!t.completed);
    }

    #[test]
    fn move_to_status_keeps_collection_position() {
        let mut state = state_with(&[
            ("A", Status::Todo),
            ("B", Status::Todo),
            ("C", Status::Todo),
        ]);
        let b = id_at(&state, 1);
        apply(
            &mut state,
            Command::MoveToStatus {
                id: b.clone(),
                status: Status::InProgress,
            },
        );
        assert_eq!(state.tasks[1].id, b);
    }

    #[test]
    fn reorder_moves_first_past_last() {
        let mut state = state_with(&[
            ("A", Status::Todo),
            ("B", Status::Todo),
            ("C", Status::Todo),
        ]);
        let a = id_at(&state, 0);
        let c = id_at(&state, 2);
        apply(
            &mut state,
            Command::Reorder {
                active_id: a,
                over_id: c,
            },
        );
        let titles: Vec<&str> = state.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["B", "C", "A"]);
    }

    #[test]
    fn reorder_moves_last_before_first() {
        let mut state = state_with(&[
            ("A", Status::Todo),
            ("B", Status::Todo),
            ("C", Status::Todo),
        ]);
        let a = id_at(&state, 0);
        let c = id_at(&state, 2);
        apply(
            &mut state,
            Command::Reorder {
                active_id: c,
                over_id: a,
            },
        );
        let titles: Vec<&str> = state.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["C", "A", "B"]);
    }

    #[test]
    fn reorder_guards_leave_collection_unchanged() {
        let mut state = state_with(&[
            ("A", Status::Todo),
            ("B", Status::InProgress),
            ("C", Status::Todo),
        ]);
        let a = id_at(&state, 0);
        let b = id_at(&state, 1);
        let before = state.clone();

        // Self-drop
        apply(
            &mut state,
            Command::Reorder {
                active_id: a.clone(),
                over_id: a.clone(),
            },
        );
        assert_eq!(state, before);

        // Missing id
        apply(
            &mut state,
            Command::Reorder {
                active_id: "missing".into(),
                over_id: a.clone(),
            },
        );
        assert_eq!(state, before);

        // Cross-status pair
        apply(
            &mut state,
            Command::Reorder {
                active_id: a,
                over_id: b,
            },
        );
        assert_eq!(state, before);
    }

    #[test]
    fn id_is_stable_across_unrelated_mutations() {
        let mut state = state_with(&[("A", Status::Todo), ("B", Status::Todo)]);
        let a = id_at(&state, 0);
        let b = id_at(&state, 1);
        apply(&mut state, Command::Delete(b));
        apply(&mut state, Command::Add(draft("C", Status::Todo)));
        assert_eq!(state.task(&a).map(|t| t.id.as_str()), Some(a.as_str()));
    }
}
