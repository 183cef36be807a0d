// ABOUTME: Task type definitions shared by the client and the CLI
// ABOUTME: Tasks, create/update/search inputs, view tabs, and the signup form

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::datetime;
use crate::validation::{validate_title, ValidationError};

/// Server-assigned task identifier
pub type TaskId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
    Archived,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Archived => "archived",
        }
    }

    /// Human-readable label for badges and tables
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To do",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Done => "Done",
            TaskStatus::Archived => "Archived",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            "archived" => Ok(TaskStatus::Archived),
            _ => Err(ValidationError::UnknownStatus(s.to_string())),
        }
    }
}

/// A task as returned by the API.
///
/// `status` and `archived` are independent: archiving never touches the
/// status, and a `done` task stays `done` in the archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "datetime::option")]
    pub due_date: Option<DateTime<Utc>>,
    /// Comma-separated tags
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub archived: bool,

    // Legacy completion flag kept in sync by the server
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default, with = "datetime::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "datetime::option")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Individual tags, trimmed, without empties
    pub fn tag_list(&self) -> Vec<&str> {
        split_tags(self.tags.as_deref().unwrap_or_default())
    }

    /// Calendar day of the due date
    pub fn due_day(&self) -> Option<NaiveDate> {
        self.due_date.map(|dt| dt.date_naive())
    }

    /// Long-form due date, e.g. "May 1, 2024"
    pub fn due_date_label(&self) -> Option<String> {
        self.due_date.map(|dt| dt.format("%B %-d, %Y").to_string())
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Done && self.due_day().map(|d| d < today).unwrap_or(false)
    }
}

pub fn split_tags(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Payload for `POST /tasks`.
///
/// Every field is always serialized; an absent due date goes out as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskCreateInput {
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "datetime::option")]
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Option<String>,
}

impl TaskCreateInput {
    /// Start a new task; rejects blank titles
    pub fn new(title: impl AsRef<str>) -> Result<Self, ValidationError> {
        Ok(Self {
            title: validate_title(title.as_ref())?,
            description: None,
            due_date: None,
            tags: None,
        })
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the due date from user input such as `2024-05-01`
    pub fn due_date_str(self, raw: &str) -> Result<Self, ValidationError> {
        Ok(self.due_date(datetime::parse_due_date(raw)?))
    }

    pub fn tags(mut self, tags: impl AsRef<str>) -> Self {
        self.tags = normalize_tags(tags.as_ref());
        self
    }
}

/// Payload for `PUT /tasks/{id}`; only populated fields are sent.
///
/// Nullable fields use `Some(None)` to clear the value on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskUpdateInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "datetime::patch::serialize"
    )]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Option<String>>,
}

impl TaskUpdateInput {
    /// Patch that marks a task complete
    pub fn complete() -> Self {
        Self {
            status: Some(TaskStatus::Done),
            done: Some(true),
            ..Default::default()
        }
    }

    pub fn with_status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Body for `POST /tasks/search`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskSearch {
    pub query: String,
    pub archived: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "datetime::option::serialize"
    )]
    pub due_date_from: Option<DateTime<Utc>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "datetime::option::serialize"
    )]
    pub due_date_to: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl TaskSearch {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn archived(mut self, archived: bool) -> Self {
        self.archived = archived;
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn due_between(mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        self.due_date_from = from;
        self.due_date_to = to;
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        self.tags = if tags.is_empty() { None } else { Some(tags) };
        self
    }
}

/// Tabs of the task view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskTab {
    All,
    Todo,
    InProgress,
    Done,
    Archived,
}

impl TaskTab {
    pub const ALL: [TaskTab; 5] = [
        TaskTab::All,
        TaskTab::Todo,
        TaskTab::InProgress,
        TaskTab::Done,
        TaskTab::Archived,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TaskTab::All => "All tasks",
            TaskTab::Todo => "To do",
            TaskTab::InProgress => "In progress",
            TaskTab::Done => "Done",
            TaskTab::Archived => "Archive",
        }
    }

    /// Whether this tab is fed by the archived list
    pub fn is_archive(&self) -> bool {
        matches!(self, TaskTab::Archived)
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskTab::All => !task.archived,
            TaskTab::Todo => !task.archived && task.status == TaskStatus::Todo,
            TaskTab::InProgress => !task.archived && task.status == TaskStatus::InProgress,
            TaskTab::Done => !task.archived && task.status == TaskStatus::Done,
            TaskTab::Archived => task.archived,
        }
    }

    pub fn filter<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }
}

impl Default for TaskTab {
    fn default() -> Self {
        TaskTab::All
    }
}

impl FromStr for TaskTab {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "all" => Ok(TaskTab::All),
            "todo" => Ok(TaskTab::Todo),
            "in_progress" => Ok(TaskTab::InProgress),
            "done" => Ok(TaskTab::Done),
            "archived" | "archive" => Ok(TaskTab::Archived),
            _ => Err(ValidationError::UnknownStatus(s.to_string())),
        }
    }
}

/// Registration form as the user fills it in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub username: String,
    pub confirm_password: Option<String>,
}

impl SignupForm {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            username: username.into(),
            confirm_password: None,
        }
    }

    pub fn confirm(mut self, confirm_password: impl Into<String>) -> Self {
        self.confirm_password = Some(confirm_password.into());
        self
    }
}

fn normalize_tags(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_task(status: TaskStatus, archived: bool) -> Task {
        Task {
            id: 1,
            title: "Buy milk".to_string(),
            description: None,
            due_date: None,
            tags: None,
            status,
            archived,
            done: status == TaskStatus::Done,
            owner_id: Some(1),
            created_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn test_task_deserializes_server_payload() {
        let task: Task = serde_json::from_value(json!({
            "id": 7,
            "title": "Write report",
            "description": null,
            "tags": "work, urgent,",
            "status": "in_progress",
            "done": false,
            "archived": false,
            "owner_id": 1,
            "created_at": "2024-04-30T08:15:00.123456",
            "due_date": "2024-05-01T00:00:00",
            "completed_at": null
        }))
        .unwrap();

        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.tag_list(), vec!["work", "urgent"]);
        assert_eq!(task.due_day(), NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(task.due_date_label().as_deref(), Some("May 1, 2024"));
    }

    #[test]
    fn test_task_tolerates_missing_optional_fields() {
        let task: Task =
            serde_json::from_value(json!({"id": 3, "title": "Minimal", "status": "todo"})).unwrap();
        assert!(!task.archived);
        assert!(task.tag_list().is_empty());
        assert!(task.created_at.is_none());
    }

    #[test]
    fn test_create_input_sends_explicit_null_due_date() {
        let input = TaskCreateInput::new("Buy milk").unwrap();
        let body = serde_json::to_value(&input).unwrap();
        assert_eq!(
            body,
            json!({"title": "Buy milk", "description": null, "due_date": null, "tags": null})
        );
    }

    #[test]
    fn test_create_input_normalizes_due_date() {
        let input = TaskCreateInput::new("Pay rent")
            .unwrap()
            .due_date_str("2024-06-01")
            .unwrap()
            .tags("  home, bills ");
        let body = serde_json::to_value(&input).unwrap();
        assert_eq!(body["due_date"], json!("2024-06-01T00:00:00.000Z"));
        assert_eq!(body["tags"], json!("home, bills"));
    }

    #[test]
    fn test_create_input_rejects_empty_title() {
        assert_eq!(TaskCreateInput::new("").unwrap_err(), ValidationError::EmptyTitle);
    }

    #[test]
    fn test_update_input_is_partial() {
        let patch = TaskUpdateInput {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"title": "Renamed"}));

        let clear_due = TaskUpdateInput {
            due_date: Some(None),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&clear_due).unwrap(), json!({"due_date": null}));
        assert!(TaskUpdateInput::default().is_empty());
    }

    #[test]
    fn test_complete_patch() {
        assert_eq!(
            serde_json::to_value(TaskUpdateInput::complete()).unwrap(),
            json!({"status": "done", "done": true})
        );
    }

    #[test]
    fn test_search_body() {
        let search = TaskSearch::new("milk").archived(true);
        assert_eq!(
            serde_json::to_value(&search).unwrap(),
            json!({"query": "milk", "archived": true})
        );

        let filtered = TaskSearch::new("").status(TaskStatus::Done).tags(["home"]);
        let body = serde_json::to_value(&filtered).unwrap();
        assert_eq!(body["status"], json!("done"));
        assert_eq!(body["tags"], json!(["home"]));
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            TaskStatus::Todo,
            TaskStatus::InProgress,
            TaskStatus::Done,
            TaskStatus::Archived,
        ] {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
        assert_eq!("in-progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert!("later".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_tabs_split_active_tasks_by_status() {
        let tasks = vec![
            sample_task(TaskStatus::Todo, false),
            sample_task(TaskStatus::Done, false),
            sample_task(TaskStatus::Done, true),
        ];

        assert_eq!(TaskTab::All.filter(&tasks).len(), 2);
        assert_eq!(TaskTab::Todo.filter(&tasks).len(), 1);
        assert_eq!(TaskTab::InProgress.filter(&tasks).len(), 0);
        assert_eq!(TaskTab::Done.filter(&tasks).len(), 1);
        assert_eq!(TaskTab::Archived.filter(&tasks).len(), 1);
    }

    #[test]
    fn test_overdue_ignores_done_tasks() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let mut task = sample_task(TaskStatus::Todo, false);
        task.due_date = datetime::parse_timestamp("2024-05-01");
        assert!(task.is_overdue(today));

        task.status = TaskStatus::Done;
        assert!(!task.is_overdue(today));
    }
}
