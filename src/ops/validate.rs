use chrono::NaiveDate;

use crate::ops::filter::parse_due_date;

/// A form-level problem with a task draft or edit. Reported at the point
/// of entry; the model layer itself accepts anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title is required")]
    TitleRequired,
    #[error("due date cannot be in the past")]
    DueDateInPast,
}

/// Check the user-entered fields before dispatching an add or update.
/// `today` is the local calendar date. An unparseable due date is treated
/// as no due date, matching the filter engine, so it never fails here.
pub fn validate(title: &str, due_date: Option<&str>, today: NaiveDate) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if title.trim().is_empty() {
        errors.push(ValidationError::TitleRequired);
    }
    if let Some(value) = due_date
        && let Some(due) = parse_due_date(value)
        && due.date() < today
    {
        errors.push(ValidationError::DueDateInPast);
    }
    errors
}
