use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ai::advisor::AdvisoryRequest;
use crate::model::board::{Command, FilterTag};
use crate::model::task::{Priority, Status, TaskDraft, TaskPatch};
use crate::ops::drop::{DropTarget, resolve_drop};
use crate::ops::validate;

use super::app::{AdvisorTab, App, FormField, FormState, Mode, ViewMode};

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Help overlay intercepts everything
    if app.show_help {
        app.show_help = false;
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Form => handle_form(app, key),
        Mode::Advisor => handle_advisor(app, key),
        Mode::ConfirmDelete => handle_confirm_delete(app, key),
    }
}

fn handle_navigate(app: &mut App, key: KeyEvent) {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Tab | KeyCode::Char('v') => {
            app.view = match app.view {
                ViewMode::Board => ViewMode::List,
                ViewMode::List => ViewMode::Board,
            };
        }

        // Cursor movement
        KeyCode::Char('h') | KeyCode::Left if !shift => focus_column(app, -1),
        KeyCode::Char('l') | KeyCode::Right if !shift => focus_column(app, 1),
        KeyCode::Char('j') | KeyCode::Down if !shift => move_cursor(app, 1),
        KeyCode::Char('k') | KeyCode::Up if !shift => move_cursor(app, -1),

        // Drag surface: shifted movement moves/reorders the selection
        KeyCode::Char('H') => drop_on_adjacent_column(app, -1),
        KeyCode::Left if shift => drop_on_adjacent_column(app, -1),
        KeyCode::Char('L') => drop_on_adjacent_column(app, 1),
        KeyCode::Right if shift => drop_on_adjacent_column(app, 1),
        KeyCode::Char('J') => drop_on_neighbor(app, 1),
        KeyCode::Down if shift => drop_on_neighbor(app, 1),
        KeyCode::Char('K') => drop_on_neighbor(app, -1),
        KeyCode::Up if shift => drop_on_neighbor(app, -1),

        KeyCode::Char(' ') => {
            if let Some(id) = app.selected_task_id() {
                app.dispatch(Command::ToggleCompletion(id));
            }
        }
        KeyCode::Char('a') => {
            let status = match app.view {
                ViewMode::Board => Status::ALL[app.column],
                ViewMode::List => Status::Todo,
            };
            app.form = Some(FormState::blank(status));
            app.mode = Mode::Form;
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(id) = app.selected_task_id()
                && let Some(task) = app.board.state().task(&id)
            {
                app.form = Some(FormState::for_task(task));
                app.mode = Mode::Form;
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = app.selected_task_id() {
                app.confirm_delete = Some(id);
                app.mode = Mode::ConfirmDelete;
            }
        }
        KeyCode::Char('i') => app.open_advisor(),
        KeyCode::Char('/') => {
            app.search_input = app.board.state().search_query.clone();
            app.mode = Mode::Search;
        }
        KeyCode::Char('f') => {
            let current = app.board.state().filter;
            let idx = FilterTag::ALL.iter().position(|f| *f == current).unwrap_or(0);
            let next = FilterTag::ALL[(idx + 1) % FilterTag::ALL.len()];
            app.dispatch(Command::SetFilter(next));
        }
        KeyCode::Char(c @ '1'..='4') => {
            let idx = (c as usize) - ('1' as usize);
            app.dispatch(Command::SetFilter(FilterTag::ALL[idx]));
        }
        KeyCode::Char('t') => {
            let next = app.board.state().theme.toggled();
            app.dispatch(Command::SetTheme(next));
        }
        _ => {}
    }
}

fn focus_column(app: &mut App, delta: i64) {
    if app.view != ViewMode::Board {
        return;
    }
    let next = app.column as i64 + delta;
    if (0..3).contains(&next) {
        app.column = next as usize;
    }
}

fn move_cursor(app: &mut App, delta: i64) {
    let (len, current) = match app.view {
        ViewMode::Board => (app.column_tasks(app.column).len(), app.cursors[app.column]),
        ViewMode::List => (app.visible_tasks().len(), app.list_cursor),
    };
    let next = current as i64 + delta;
    if next >= 0 && (next as usize) < len {
        match app.view {
            ViewMode::Board => app.cursors[app.column] = next as usize,
            ViewMode::List => app.list_cursor = next as usize,
        }
    }
}

/// Shift-left/right: drop the selected task on the adjacent column
fn drop_on_adjacent_column(app: &mut App, delta: i64) {
    if app.view != ViewMode::Board {
        return;
    }
    let target_column = app.column as i64 + delta;
    if !(0..3).contains(&target_column) {
        return;
    }
    let target_column = target_column as usize;
    let Some(active_id) = app.selected_task_id() else {
        return;
    };
    let target = DropTarget::Column(Status::ALL[target_column]);
    if let Some(command) = resolve_drop(app.board.state(), &active_id, Some(target)) {
        app.dispatch(command);
        // Follow the task into its new column
        app.column = target_column;
        let position = app
            .column_tasks(target_column)
            .iter()
            .position(|t| t.id == active_id);
        if let Some(position) = position {
            app.cursors[target_column] = position;
        }
    }
}

/// Shift-up/down: drop the selected task on its column neighbor
fn drop_on_neighbor(app: &mut App, delta: i64) {
    if app.view != ViewMode::Board {
        return;
    }
    let tasks = app.column_tasks(app.column);
    let cursor = app.cursors[app.column];
    let over = cursor as i64 + delta;
    if over < 0 || over as usize >= tasks.len() {
        return;
    }
    let Some(active) = tasks.get(cursor) else {
        return;
    };
    let active_id = active.id.clone();
    let over_id = tasks[over as usize].id.clone();
    if let Some(command) = resolve_drop(
        app.board.state(),
        &active_id,
        Some(DropTarget::Task(over_id)),
    ) {
        app.dispatch(command);
        let position = app
            .column_tasks(app.column)
            .iter()
            .position(|t| t.id == active_id);
        if let Some(position) = position {
            app.cursors[app.column] = position;
        }
    }
}

fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.search_input.clear();
            app.dispatch(Command::SetSearch(String::new()));
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => app.mode = Mode::Navigate,
        KeyCode::Backspace => {
            app.search_input.pop();
            app.dispatch(Command::SetSearch(app.search_input.clone()));
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            app.dispatch(Command::SetSearch(app.search_input.clone()));
        }
        _ => {}
    }
}

fn handle_form(app: &mut App, key: KeyEvent) {
    let Some(form) = &mut app.form else {
        app.mode = Mode::Navigate;
        return;
    };
    match key.code {
        KeyCode::Esc => {
            app.form = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Tab | KeyCode::Down => form.field = form.field.next(),
        KeyCode::BackTab | KeyCode::Up => form.field = form.field.prev(),
        KeyCode::Left | KeyCode::Right if form.field == FormField::Priority => {
            let idx = Priority::ALL
                .iter()
                .position(|p| *p == form.priority)
                .unwrap_or(1);
            let next = if key.code == KeyCode::Right {
                (idx + 1) % Priority::ALL.len()
            } else {
                (idx + Priority::ALL.len() - 1) % Priority::ALL.len()
            };
            form.priority = Priority::ALL[next];
        }
        KeyCode::Backspace => {
            match form.field {
                FormField::Title => form.title.pop(),
                FormField::Description => form.description.pop(),
                FormField::DueDate => form.due_date.pop(),
                FormField::Priority => None,
            };
        }
        KeyCode::Char(c) => match form.field {
            FormField::Title => form.title.push(c),
            FormField::Description => form.description.push(c),
            FormField::DueDate => form.due_date.push(c),
            FormField::Priority => {}
        },
        KeyCode::Enter => submit_form(app),
        _ => {}
    }
}

/// Validate and dispatch the form. Validation failures keep the form
/// open with inline errors; the board state is untouched.
fn submit_form(app: &mut App) {
    let Some(form) = &mut app.form else {
        return;
    };
    let due_date = if form.due_date.trim().is_empty() {
        None
    } else {
        Some(form.due_date.trim().to_string())
    };
    let today = chrono::Local::now().date_naive();
    let errors = validate::validate(&form.title, due_date.as_deref(), today);
    if !errors.is_empty() {
        form.errors = errors;
        return;
    }

    let command = match &form.editing {
        Some(id) => Command::Update(TaskPatch {
            id: id.clone(),
            title: Some(form.title.trim().to_string()),
            description: Some(form.description.clone()),
            priority: Some(form.priority),
            due_date: Some(due_date),
            ..Default::default()
        }),
        None => Command::Add(TaskDraft {
            title: form.title.trim().to_string(),
            description: form.description.clone(),
            priority: form.priority,
            status: Some(form.status),
            due_date,
        }),
    };
    app.form = None;
    app.mode = Mode::Navigate;
    app.dispatch(command);
}

fn handle_advisor(app: &mut App, key: KeyEvent) {
    let Some(advisor) = &mut app.advisor else {
        app.mode = Mode::Navigate;
        return;
    };
    match key.code {
        KeyCode::Esc => {
            // Dropping the session abandons any pending call
            app.advisor = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Tab => {
            advisor.tab = match advisor.tab {
                AdvisorTab::Analyze => AdvisorTab::Ask,
                AdvisorTab::Ask => AdvisorTab::Subtasks,
                AdvisorTab::Subtasks => AdvisorTab::Analyze,
            };
        }
        KeyCode::Enter => match advisor.tab {
            AdvisorTab::Analyze => app.start_advisory(AdvisoryRequest::Analyze),
            AdvisorTab::Ask => {
                let question = advisor.question.trim().to_string();
                if !question.is_empty() {
                    app.start_advisory(AdvisoryRequest::Ask(question));
                }
            }
            AdvisorTab::Subtasks => {
                if advisor.subtasks.is_empty() {
                    app.start_advisory(AdvisoryRequest::SuggestSubtasks);
                } else {
                    app.accept_suggestion();
                }
            }
        },
        KeyCode::Backspace if advisor.tab == AdvisorTab::Ask => {
            advisor.question.pop();
        }
        KeyCode::Down if advisor.tab == AdvisorTab::Subtasks => {
            if advisor.subtask_cursor + 1 < advisor.subtasks.len() {
                advisor.subtask_cursor += 1;
            }
        }
        KeyCode::Up if advisor.tab == AdvisorTab::Subtasks => {
            advisor.subtask_cursor = advisor.subtask_cursor.saturating_sub(1);
        }
        KeyCode::Char(c) if advisor.tab == AdvisorTab::Ask => advisor.question.push(c),
        KeyCode::Char('j') if advisor.tab == AdvisorTab::Subtasks => {
            if advisor.subtask_cursor + 1 < advisor.subtasks.len() {
                advisor.subtask_cursor += 1;
            }
        }
        KeyCode::Char('k') if advisor.tab == AdvisorTab::Subtasks => {
            advisor.subtask_cursor = advisor.subtask_cursor.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_confirm_delete(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(id) = app.confirm_delete.take() {
                app.dispatch(Command::Delete(id));
            }
            app.mode = Mode::Navigate;
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.confirm_delete = None;
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}
