use crate::model::board::{BoardState, Command};
use crate::model::task::Status;

/// Where a drag gesture ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// A column marker (the column body, not a task in it)
    Column(Status),
    /// Another task, identified by id
    Task(String),
}

/// Translate a finished drag gesture into a board command.
///
/// Decision table:
/// - no target: cancelled, nothing happens
/// - column target with a different status: move there
/// - column target with the same status: nothing
/// - task target that is the active task itself: nothing
/// - task target in the same column: reorder onto it
/// - task target in another column: move to that column (the task keeps
///   its collection position, it is not interpolated at the target)
pub fn resolve_drop(
    state: &BoardState,
    active_id: &str,
    target: Option<DropTarget>,
) -> Option<Command> {
    let active = state.task(active_id)?;
    match target? {
        DropTarget::Column(status) => {
            if status == active.status {
                None
            } else {
                Some(Command::MoveToStatus {
                    id: active.id.clone(),
                    status,
                })
            }
        }
        DropTarget::Task(over_id) => {
            if over_id == active_id {
                return None;
            }
            let over = state.task(&over_id)?;
            if over.status == active.status {
                Some(Command::Reorder {
                    active_id: active.id.clone(),
                    over_id,
                })
            } else {
                Some(Command::MoveToStatus {
                    id: active.id.clone(),
                    status: over.status,
                })
            }
        }
    }
}
