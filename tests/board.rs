//! End-to-end tests for the board: dispatch through a real store,
//! reopen, and verify what survived.

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use taskdeck::io::store::Store;
use taskdeck::model::board::{Board, Command, FilterTag, ThemeChoice};
use taskdeck::model::task::{Status, TaskDraft, TaskPatch};
use taskdeck::ops::drop::{DropTarget, resolve_drop};

fn open_board(dir: &TempDir) -> Board {
    let store = Store::open(dir.path()).unwrap();
    Board::open(store)
}

fn add(board: &mut Board, title: &str, status: Status) -> String {
    board.dispatch(Command::Add(TaskDraft {
        title: title.to_string(),
        status: Some(status),
        ..Default::default()
    }));
    board.state().tasks.last().unwrap().id.clone()
}

#[test]
fn fresh_store_is_seeded_and_persisted() {
    let dir = TempDir::new().unwrap();
    let board = open_board(&dir);
    assert_eq!(board.state().tasks.len(), 8);
    assert!(dir.path().join("tasks.json").exists());

    // The seed survives a reopen unchanged
    let reopened = open_board(&dir);
    assert_eq!(reopened.state().tasks, board.state().tasks);
}

#[test]
fn emptied_board_stays_empty_on_reopen() {
    let dir = TempDir::new().unwrap();
    let mut board = open_board(&dir);
    let ids: Vec<String> = board.state().tasks.iter().map(|t| t.id.clone()).collect();
    for id in ids {
        board.dispatch(Command::Delete(id));
    }
    assert!(board.state().tasks.is_empty());

    // A saved empty list is real state, not an invitation to reseed
    let reopened = open_board(&dir);
    assert!(reopened.state().tasks.is_empty());
}

#[test]
fn added_task_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let mut board = open_board(&dir);
    let id = add(&mut board, "Water the plants", Status::Todo);

    let reopened = open_board(&dir);
    let task = reopened.state().task(&id).unwrap();
    assert_eq!(task.title, "Water the plants");
    assert_eq!(task.status, Status::Todo);
    assert!(!task.completed);
}

#[test]
fn update_and_delete_are_persisted() {
    let dir = TempDir::new().unwrap();
    let mut board = open_board(&dir);
    let id = add(&mut board, "Draft", Status::Todo);

    board.dispatch(Command::Update(TaskPatch {
        id: id.clone(),
        title: Some("Final".to_string()),
        due_date: Some(Some("2030-01-01".to_string())),
        ..Default::default()
    }));
    let reopened = open_board(&dir);
    let task = reopened.state().task(&id).unwrap();
    assert_eq!(task.title, "Final");
    assert_eq!(task.due_date.as_deref(), Some("2030-01-01"));

    board.dispatch(Command::Delete(id.clone()));
    let reopened = open_board(&dir);
    assert!(reopened.state().task(&id).is_none());
}

#[test]
fn clearing_a_due_date_persists_as_null() {
    let dir = TempDir::new().unwrap();
    let mut board = open_board(&dir);
    let id = add(&mut board, "Dated", Status::Todo);
    board.dispatch(Command::Update(TaskPatch {
        id: id.clone(),
        due_date: Some(Some("2030-06-01".to_string())),
        ..Default::default()
    }));
    board.dispatch(Command::Update(TaskPatch {
        id: id.clone(),
        due_date: Some(None),
        ..Default::default()
    }));

    let reopened = open_board(&dir);
    assert_eq!(reopened.state().task(&id).unwrap().due_date, None);
}

#[test]
fn toggle_completion_round_trips_through_the_store() {
    let dir = TempDir::new().unwrap();
    let mut board = open_board(&dir);
    let id = add(&mut board, "Chore", Status::InProgress);

    board.dispatch(Command::ToggleCompletion(id.clone()));
    let reopened = open_board(&dir);
    let task = reopened.state().task(&id).unwrap();
    assert!(task.completed);
    assert_eq!(task.status, Status::Completed);

    board.dispatch(Command::ToggleCompletion(id.clone()));
    let reopened = open_board(&dir);
    let task = reopened.state().task(&id).unwrap();
    assert!(!task.completed);
    assert_eq!(task.status, Status::Todo);
}

#[test]
fn corrupt_tasks_file_falls_back_to_samples() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("tasks.json"), "{not json").unwrap();
    let board = open_board(&dir);
    assert_eq!(board.state().tasks.len(), 8);

    // Opening also rewrote the key, so the next open reads cleanly
    let store = Store::open(dir.path()).unwrap();
    assert_eq!(store.load_tasks().unwrap().len(), 8);
}

#[test]
fn theme_choice_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let mut board = open_board(&dir);
    assert_eq!(board.state().theme, ThemeChoice::Light);
    board.dispatch(Command::SetTheme(ThemeChoice::Dark));

    let reopened = open_board(&dir);
    assert_eq!(reopened.state().theme, ThemeChoice::Dark);
}

#[test]
fn filters_and_search_do_not_touch_the_collection() {
    let dir = TempDir::new().unwrap();
    let mut board = open_board(&dir);
    let before = board.state().tasks.clone();
    let revision = board.revision();

    board.dispatch(Command::SetFilter(FilterTag::HighPriority));
    board.dispatch(Command::SetSearch("design".to_string()));
    assert_eq!(board.state().tasks, before);
    assert_eq!(board.state().filter, FilterTag::HighPriority);
    assert_eq!(board.state().search_query, "design");
    assert!(board.revision() > revision);
}

#[test]
fn column_drop_moves_and_persists_position() {
    let dir = TempDir::new().unwrap();
    let mut board = open_board(&dir);
    let a = add(&mut board, "A", Status::Todo);
    let b = add(&mut board, "B", Status::Todo);

    let command = resolve_drop(
        board.state(),
        &a,
        Some(DropTarget::Column(Status::InProgress)),
    )
    .unwrap();
    assert_eq!(
        command,
        Command::MoveToStatus {
            id: a.clone(),
            status: Status::InProgress
        }
    );
    board.dispatch(command);

    let reopened = open_board(&dir);
    let task = reopened.state().task(&a).unwrap();
    assert_eq!(task.status, Status::InProgress);
    // The collection position of the moved task is unchanged
    let pos_a = reopened.state().tasks.iter().position(|t| t.id == a);
    let pos_b = reopened.state().tasks.iter().position(|t| t.id == b);
    assert!(pos_a < pos_b);
}

#[test]
fn same_column_drop_reorders_and_persists() {
    let dir = TempDir::new().unwrap();
    let mut board = open_board(&dir);
    let a = add(&mut board, "First", Status::InProgress);
    let b = add(&mut board, "Second", Status::InProgress);
    let c = add(&mut board, "Third", Status::InProgress);

    let command = resolve_drop(board.state(), &a, Some(DropTarget::Task(c.clone()))).unwrap();
    board.dispatch(command);

    // The seeded samples also live in this column; assert only the
    // relative order of the tasks this test created.
    let reopened = open_board(&dir);
    let order: Vec<&str> = reopened
        .state()
        .tasks
        .iter()
        .filter(|t| t.status == Status::InProgress)
        .map(|t| t.id.as_str())
        .filter(|id| [a.as_str(), b.as_str(), c.as_str()].contains(id))
        .collect();
    assert_eq!(order, vec![b.as_str(), c.as_str(), a.as_str()]);
}

#[test]
fn cross_column_task_drop_changes_status_only() {
    let dir = TempDir::new().unwrap();
    let mut board = open_board(&dir);
    let p = add(&mut board, "P", Status::InProgress);
    let q = add(&mut board, "Q", Status::InProgress);
    let x = add(&mut board, "X", Status::Todo);

    // Dropping X on P resolves to a move, never a splice
    let command = resolve_drop(board.state(), &x, Some(DropTarget::Task(p.clone()))).unwrap();
    assert_eq!(
        command,
        Command::MoveToStatus {
            id: x.clone(),
            status: Status::InProgress
        }
    );
    board.dispatch(command);

    // X was created last, so it lands after P and Q rather than at P's
    // slot. Assertions scoped to this test's ids; the seeds also occupy
    // the column.
    let order: Vec<&str> = board
        .state()
        .tasks
        .iter()
        .filter(|t| t.status == Status::InProgress)
        .map(|t| t.id.as_str())
        .filter(|id| [p.as_str(), q.as_str(), x.as_str()].contains(id))
        .collect();
    assert_eq!(order, vec![p.as_str(), q.as_str(), x.as_str()]);
}

#[test]
fn drop_on_nothing_resolves_to_no_command() {
    let dir = TempDir::new().unwrap();
    let mut board = open_board(&dir);
    let a = add(&mut board, "A", Status::Todo);
    assert_eq!(resolve_drop(board.state(), &a, None), None);
    assert_eq!(
        resolve_drop(board.state(), &a, Some(DropTarget::Task(a.clone()))),
        None
    );
}
