use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::ai::advisor::{self, AdvisoryReply, AdvisoryRequest, PendingCall};
use crate::ai::gateway::{Gateway, SubtaskSuggestion};
use crate::io::config_io::read_config;
use crate::io::store::Store;
use crate::model::board::{Board, Command};
use crate::model::task::{Priority, Status, Task, TaskDraft};
use crate::ops::filter;
use crate::ops::validate::ValidationError;

use super::input;
use super::render;
use super::theme::Theme;

/// Which main view is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Board,
    List,
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Search,
    Form,
    Advisor,
    ConfirmDelete,
}

/// Field focus inside the task form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    DueDate,
    Priority,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::DueDate,
            FormField::DueDate => FormField::Priority,
            FormField::Priority => FormField::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::Priority,
            FormField::Description => FormField::Title,
            FormField::DueDate => FormField::Description,
            FormField::Priority => FormField::DueDate,
        }
    }
}

/// Create/edit form state. Validation errors are shown inline and the
/// form stays open until they are fixed or the user cancels.
#[derive(Debug, Clone)]
pub struct FormState {
    /// Some(task id) when editing, None when creating
    pub editing: Option<String>,
    pub field: FormField,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: String,
    /// Column a brand-new task lands in
    pub status: Status,
    pub errors: Vec<ValidationError>,
}

impl FormState {
    pub fn blank(status: Status) -> Self {
        FormState {
            editing: None,
            field: FormField::Title,
            title: String::new(),
            description: String::new(),
            priority: Priority::default(),
            due_date: String::new(),
            status,
            errors: Vec::new(),
        }
    }

    pub fn for_task(task: &Task) -> Self {
        FormState {
            editing: Some(task.id.clone()),
            field: FormField::Title,
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            due_date: task.due_date.clone().unwrap_or_default(),
            status: task.status,
            errors: Vec::new(),
        }
    }
}

/// Tab inside the advisory pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisorTab {
    Analyze,
    Ask,
    Subtasks,
}

/// One open advisory session, scoped to a single task. Closing the pane
/// drops any pending call, which abandons it.
pub struct AdvisorState {
    pub task_id: String,
    pub task_title: String,
    pub tab: AdvisorTab,
    pub question: String,
    pub output: Option<String>,
    pub subtasks: Vec<SubtaskSuggestion>,
    pub subtask_cursor: usize,
    pub error: Option<String>,
    pub pending: Option<PendingCall>,
}

/// Main application state
pub struct App {
    pub board: Board,
    pub gateway: Option<Arc<Gateway>>,
    /// Why the gateway is unavailable, shown when opening the advisor
    pub gateway_error: Option<String>,
    pub view: ViewMode,
    pub mode: Mode,
    pub theme: Theme,
    /// Board view: focused column index into `Status::ALL`
    pub column: usize,
    /// Board view: per-column cursor
    pub cursors: [usize; 3],
    /// List view cursor
    pub list_cursor: usize,
    pub search_input: String,
    pub form: Option<FormState>,
    pub advisor: Option<AdvisorState>,
    /// Task id awaiting delete confirmation
    pub confirm_delete: Option<String>,
    pub show_help: bool,
    pub should_quit: bool,
    /// Revision last rendered, to skip redundant cursor clamps
    last_seen_revision: u64,
}

impl App {
    pub fn new(board: Board, gateway: Result<Gateway, String>) -> Self {
        let theme = Theme::from_choice(board.state().theme);
        let (gateway, gateway_error) = match gateway {
            Ok(g) => (Some(Arc::new(g)), None),
            Err(message) => (None, Some(message)),
        };
        App {
            board,
            gateway,
            gateway_error,
            view: ViewMode::Board,
            mode: Mode::Navigate,
            theme,
            column: 0,
            cursors: [0; 3],
            list_cursor: 0,
            search_input: String::new(),
            form: None,
            advisor: None,
            confirm_delete: None,
            show_help: false,
            should_quit: false,
            last_seen_revision: 0,
        }
    }

    /// Dispatch a board command and keep the cursors and theme in step
    /// with the new state.
    pub fn dispatch(&mut self, command: Command) {
        self.board.dispatch(command);
        self.theme = Theme::from_choice(self.board.state().theme);
        self.clamp_cursors();
    }

    /// Tasks visible in one board column under the active filter/search
    pub fn column_tasks(&self, column: usize) -> Vec<&Task> {
        filter::column_tasks(self.board.state(), Status::ALL[column])
    }

    /// Tasks visible in the list view
    pub fn visible_tasks(&self) -> Vec<&Task> {
        filter::visible_tasks(self.board.state())
    }

    /// The task id under the cursor in the current view
    pub fn selected_task_id(&self) -> Option<String> {
        match self.view {
            ViewMode::Board => {
                let tasks = self.column_tasks(self.column);
                tasks.get(self.cursors[self.column]).map(|t| t.id.clone())
            }
            ViewMode::List => {
                let tasks = self.visible_tasks();
                tasks.get(self.list_cursor).map(|t| t.id.clone())
            }
        }
    }

    /// Clamp cursors after the visible set shrinks
    pub fn clamp_cursors(&mut self) {
        if self.board.revision() == self.last_seen_revision {
            return;
        }
        self.last_seen_revision = self.board.revision();
        for (column, cursor) in self.cursors.iter_mut().enumerate() {
            let len = filter::column_tasks(self.board.state(), Status::ALL[column]).len();
            *cursor = (*cursor).min(len.saturating_sub(1));
        }
        let len = filter::visible_tasks(self.board.state()).len();
        self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
    }

    /// Open the advisory pane for the selected task and, when the
    /// gateway is available, kick off the automatic analysis.
    pub fn open_advisor(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        let Some(task) = self.board.state().task(&id).cloned() else {
            return;
        };
        let mut state = AdvisorState {
            task_id: task.id.clone(),
            task_title: task.title.clone(),
            tab: AdvisorTab::Analyze,
            question: String::new(),
            output: None,
            subtasks: Vec::new(),
            subtask_cursor: 0,
            error: self.gateway_error.clone(),
            pending: None,
        };
        if let Some(gateway) = &self.gateway {
            state.pending = Some(advisor::spawn(
                Arc::clone(gateway),
                task,
                AdvisoryRequest::Analyze,
            ));
        }
        self.advisor = Some(state);
        self.mode = Mode::Advisor;
    }

    /// Start an advisory request on the open session, replacing any
    /// pending one (the old call is abandoned by dropping its handle).
    pub fn start_advisory(&mut self, request: AdvisoryRequest) {
        let Some(advisor_state) = &mut self.advisor else {
            return;
        };
        let Some(gateway) = &self.gateway else {
            advisor_state.error = self.gateway_error.clone();
            return;
        };
        let Some(task) = self.board.state().task(&advisor_state.task_id).cloned() else {
            advisor_state.error = Some("task no longer exists".to_string());
            return;
        };
        advisor_state.error = None;
        advisor_state.pending = Some(advisor::spawn(Arc::clone(gateway), task, request));
    }

    /// Poll the pending advisory call, if any. Called every tick.
    pub fn poll_advisor(&mut self) {
        let Some(advisor_state) = &mut self.advisor else {
            return;
        };
        let Some(pending) = &advisor_state.pending else {
            return;
        };
        let Some(result) = pending.poll() else {
            return;
        };
        advisor_state.pending = None;
        match result {
            Ok(AdvisoryReply::Text(text)) => {
                advisor_state.output = Some(text);
                advisor_state.error = None;
            }
            Ok(AdvisoryReply::Subtasks(subtasks)) => {
                advisor_state.subtasks = subtasks;
                advisor_state.subtask_cursor = 0;
                advisor_state.error = None;
            }
            Err(e) => advisor_state.error = Some(e.to_string()),
        }
    }

    /// Accept the selected subtask suggestion as a new todo task
    pub fn accept_suggestion(&mut self) {
        let Some(advisor_state) = &self.advisor else {
            return;
        };
        let Some(suggestion) = advisor_state
            .subtasks
            .get(advisor_state.subtask_cursor)
            .cloned()
        else {
            return;
        };
        self.dispatch(Command::Add(TaskDraft {
            title: suggestion.title,
            description: suggestion.description,
            ..Default::default()
        }));
    }

    /// Today's local calendar date, for form validation
    pub fn today(&self) -> chrono::NaiveDate {
        Local::now().date_naive()
    }
}

/// Resolve the data directory: the explicit flag, or the platform data
/// dir, or `.taskdeck` in the current directory as a last resort.
fn resolve_data_dir(data_dir: Option<&Path>) -> PathBuf {
    match data_dir {
        Some(dir) => dir.to_path_buf(),
        None => dirs::data_dir()
            .map(|d| d.join("taskdeck"))
            .unwrap_or_else(|| PathBuf::from(".taskdeck")),
    }
}

/// Run the TUI application
pub fn run(data_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = resolve_data_dir(data_dir);
    let store = Store::open(&data_dir)?;
    let config = read_config(&data_dir)?;
    let board = Board::open(store);
    let gateway = Gateway::from_config(&config.ai).map_err(|e| e.to_string());

    let mut app = App::new(board, gateway);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.poll_advisor();
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::board::{BoardState, apply};
    use tempfile::TempDir;

    fn test_app() -> (App, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let board = Board::open(store);
        let app = App::new(board, Err("no key".to_string()));
        (app, dir)
    }

    #[test]
    fn fresh_board_is_seeded_with_samples() {
        let (app, _dir) = test_app();
        assert_eq!(app.board.state().tasks.len(), 8);
    }

    #[test]
    fn selected_task_follows_board_cursor() {
        let (mut app, _dir) = test_app();
        app.column = 0;
        app.cursors[0] = 0;
        let expected = app.column_tasks(0)[0].id.clone();
        assert_eq!(app.selected_task_id(), Some(expected));
    }

    #[test]
    fn cursor_clamps_when_column_shrinks() {
        let (mut app, _dir) = test_app();
        let ids: Vec<String> = app.column_tasks(0).iter().map(|t| t.id.clone()).collect();
        app.cursors[0] = ids.len() - 1;
        for id in ids {
            app.dispatch(Command::Delete(id));
        }
        assert_eq!(app.cursors[0], 0);
    }

    #[test]
    fn accept_suggestion_adds_a_todo_task() {
        let (mut app, _dir) = test_app();
        let first = app.board.state().tasks[0].clone();
        app.advisor = Some(AdvisorState {
            task_id: first.id,
            task_title: first.title,
            tab: AdvisorTab::Subtasks,
            question: String::new(),
            output: None,
            subtasks: vec![SubtaskSuggestion {
                title: "Suggested".into(),
                description: "From the advisor".into(),
            }],
            subtask_cursor: 0,
            error: None,
            pending: None,
        });
        let before = app.board.state().tasks.len();
        app.accept_suggestion();
        let state = app.board.state();
        assert_eq!(state.tasks.len(), before + 1);
        let added = state.tasks.last().unwrap();
        assert_eq!(added.title, "Suggested");
        assert_eq!(added.status, Status::Todo);
    }

    #[test]
    fn board_and_list_agree_on_visible_tasks() {
        let (app, _dir) = test_app();
        let by_columns: usize = (0..3).map(|c| app.column_tasks(c).len()).sum();
        assert_eq!(by_columns, app.visible_tasks().len());
    }

    #[test]
    fn apply_is_usable_without_a_store() {
        // The transition function stands alone for library callers
        let mut state = BoardState::default();
        apply(
            &mut state,
            Command::Add(TaskDraft {
                title: "standalone".into(),
                ..Default::default()
            }),
        );
        assert_eq!(state.tasks.len(), 1);
    }
}
