use chrono::{DateTime, TimeZone, Utc};

use crate::model::task::{Priority, Status, Task};

/// The fixed demo set a fresh board is seeded with when the store holds
/// no tasks.
pub fn sample_tasks() -> Vec<Task> {
    vec![
        sample(
            "1",
            "Design new landing page",
            "Create a modern, responsive landing page for the new product launch. \
             Focus on mobile-first design and accessibility.",
            Priority::High,
            Status::InProgress,
            "2024-01-20",
            (2024, 1, 15, 10, 0, 0),
            (2024, 1, 15, 10, 0, 0),
        ),
        sample(
            "2",
            "Review quarterly reports",
            "Analyze Q4 performance metrics and prepare executive summary for board meeting.",
            Priority::Urgent,
            Status::Todo,
            "2024-01-18",
            (2024, 1, 14, 14, 30, 0),
            (2024, 1, 14, 14, 30, 0),
        ),
        sample(
            "3",
            "Update team documentation",
            "Refresh onboarding docs and API documentation for new team members.",
            Priority::Medium,
            Status::Completed,
            "2024-01-16",
            (2024, 1, 10, 9, 15, 0),
            (2024, 1, 16, 16, 45, 0),
        ),
        sample(
            "4",
            "Plan team offsite",
            "Organize quarterly team building event. Research venues, activities, and logistics.",
            Priority::Low,
            Status::Todo,
            "2024-02-01",
            (2024, 1, 12, 11, 20, 0),
            (2024, 1, 12, 11, 20, 0),
        ),
        sample(
            "5",
            "Implement user authentication",
            "Add OAuth integration and user session management to the application.",
            Priority::High,
            Status::InProgress,
            "2024-01-22",
            (2024, 1, 13, 8, 45, 0),
            (2024, 1, 13, 8, 45, 0),
        ),
        sample(
            "6",
            "Code review for PR #123",
            "Review and provide feedback on the new feature implementation.",
            Priority::Medium,
            Status::Completed,
            "2024-01-17",
            (2024, 1, 16, 13, 10, 0),
            (2024, 1, 17, 10, 30, 0),
        ),
        sample(
            "7",
            "Research new technologies",
            "Investigate latest frontend frameworks and tools for potential adoption.",
            Priority::Low,
            Status::Todo,
            "2024-01-25",
            (2024, 1, 14, 16, 0, 0),
            (2024, 1, 14, 16, 0, 0),
        ),
        sample(
            "8",
            "Fix critical bug in payment flow",
            "Resolve issue where users cannot complete checkout process on mobile devices.",
            Priority::Urgent,
            Status::InProgress,
            "2024-01-19",
            (2024, 1, 15, 12, 30, 0),
            (2024, 1, 15, 12, 30, 0),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: &str,
    title: &str,
    description: &str,
    priority: Priority,
    status: Status,
    due_date: &str,
    created: (i32, u32, u32, u32, u32, u32),
    updated: (i32, u32, u32, u32, u32, u32),
) -> Task {
    Task {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        priority,
        status,
        due_date: Some(due_date.into()),
        completed: status == Status::Completed,
        created_at: ts(created),
        updated_at: ts(updated),
    }
}

fn ts((y, mo, d, h, mi, s): (i32, u32, u32, u32, u32, u32)) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_set_has_unique_ids_and_synced_completion() {
        let tasks = sample_tasks();
        assert_eq!(tasks.len(), 8);
        for (i, task) in tasks.iter().enumerate() {
            assert_eq!(task.completed, task.status == Status::Completed);
            assert!(
                tasks[i + 1..].iter().all(|other| other.id != task.id),
                "duplicate id {}",
                task.id
            );
        }
    }

    #[test]
    fn sample_set_covers_all_columns() {
        let tasks = sample_tasks();
        for status in Status::ALL {
            assert!(tasks.iter().any(|t| t.status == status));
        }
    }
}
