// ABOUTME: Turns interactive edit answers into an update patch
// ABOUTME: Only fields the user actually changed end up in the patch

use chrono::{DateTime, Utc};

use taskmaster_core::{Task, TaskStatus, TaskUpdateInput};

/// Trimmed value, or `None` when blank
pub fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.trim().to_string())
    }
}

/// Values collected by the edit prompts
#[derive(Debug, Clone)]
pub struct EditAnswers {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Option<String>,
    pub status: TaskStatus,
}

/// Statuses offered when editing `current`, which is always among them
pub fn status_choices(current: TaskStatus) -> Vec<TaskStatus> {
    let mut choices = vec![TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];
    if !choices.contains(&current) {
        choices.push(current);
    }
    choices
}

fn normalized(value: Option<&str>) -> Option<String> {
    value.and_then(|v| non_blank(v.to_string()))
}

/// Patch holding only what differs from `task`.
///
/// Due dates are compared by calendar day, since the prompt only edits the day.
pub fn edit_patch(task: &Task, answers: EditAnswers) -> TaskUpdateInput {
    let mut patch = TaskUpdateInput::default();

    let title = answers.title.trim();
    if title != task.title.trim() {
        patch.title = Some(title.to_string());
    }

    let description = answers.description.and_then(non_blank);
    if description != normalized(task.description.as_deref()) {
        patch.description = Some(description);
    }

    let day = |dt: &DateTime<Utc>| dt.date_naive();
    if answers.due_date.as_ref().map(day) != task.due_date.as_ref().map(day) {
        patch.due_date = Some(answers.due_date);
    }

    let tags = answers.tags.and_then(non_blank);
    if tags != normalized(task.tags.as_deref()) {
        patch.tags = Some(tags);
    }

    if answers.status != task.status {
        patch.status = Some(answers.status);
    }

    patch
}
