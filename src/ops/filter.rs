use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::model::board::{BoardState, FilterTag};
use crate::model::task::{Status, Task};

/// Parse a due-date value into a local wall-clock instant.
///
/// A string matching `YYYY-MM-DD` is read as a local calendar date at
/// local midnight. Routing such strings through a UTC-based parse would
/// shift them off by a day near midnight in non-UTC timezones, which is
/// exactly the bug this function exists to avoid. Anything else falls
/// back to generic timestamp parsing; unparseable values mean "no due
/// date", never an error.
pub fn parse_due_date(value: &str) -> Option<NaiveDateTime> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").ok()
}

fn due_datetime(task: &Task) -> Option<NaiveDateTime> {
    task.due_date.as_deref().and_then(parse_due_date)
}

/// Inclusive [start, end] window covering one whole local day
fn day_window(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = day.and_time(NaiveTime::MIN);
    let end = start + Duration::days(1) - Duration::milliseconds(1);
    (start, end)
}

/// Compute the filtered, searched view of the collection. Pure over
/// `(tasks, filter, query, now)`; relative order is preserved.
pub fn filtered<'a>(
    tasks: &'a [Task],
    filter: FilterTag,
    query: &str,
    now: NaiveDateTime,
) -> Vec<&'a Task> {
    let query = query.trim().to_lowercase();
    let mut result: Vec<&Task> = tasks
        .iter()
        .filter(|task| {
            query.is_empty()
                || task.title.to_lowercase().contains(&query)
                || task.description.to_lowercase().contains(&query)
        })
        .collect();

    match filter {
        FilterTag::All => {}
        FilterTag::Today => {
            let (start, end) = day_window(now.date());
            result.retain(|task| {
                due_datetime(task).is_some_and(|due| due >= start && due <= end)
            });
        }
        FilterTag::Upcoming => {
            // Tomorrow only: a fixed one-day lookahead, not an open-ended
            // future range.
            let (start, end) = day_window(now.date() + Duration::days(1));
            result.retain(|task| {
                due_datetime(task).is_some_and(|due| due >= start && due <= end)
            });
        }
        FilterTag::HighPriority => {
            result.retain(|task| task.priority.is_high());
        }
    }

    result
}

/// The filtered view narrowed to one status column, for board rendering
pub fn by_status<'a>(
    tasks: &'a [Task],
    status: Status,
    filter: FilterTag,
    query: &str,
    now: NaiveDateTime,
) -> Vec<&'a Task> {
    let mut result = filtered(tasks, filter, query, now);
    result.retain(|task| task.status == status);
    result
}

/// Convenience over the whole board state with the real clock
pub fn visible_tasks(state: &BoardState) -> Vec<&Task> {
    filtered(
        &state.tasks,
        state.filter,
        &state.search_query,
        Local::now().naive_local(),
    )
}

/// Convenience for one column with the real clock
pub fn column_tasks(state: &BoardState, status: Status) -> Vec<&Task> {
    by_status(
        &state.tasks,
        status,
        state.filter,
        &state.search_query,
        Local::now().naive_local(),
    )
}
