use chrono::{DateTime, Utc};
use clap::Subcommand;
use colored::*;
use inquire::{Confirm, Select, Text};

use taskmaster_cli::edit::{edit_patch, non_blank, status_choices, EditAnswers};
use taskmaster_cli::output::{print_task_details, tab_bar, task_table};
use taskmaster_client::{
    TaskBoard, TaskCreateInput, TaskId, TaskSearch, TaskStatus, TaskTab, TaskUpdateInput,
};
use taskmaster_core::datetime::parse_due_date;

use super::App;

#[derive(Subcommand)]
pub enum TasksCommands {
    /// List tasks in one tab: all, todo, in_progress, done, archived
    List {
        #[arg(long, default_value = "all")]
        tab: TaskTab,
    },
    /// Show task details
    Show {
        id: TaskId,
    },
    /// Add a new task
    Add {
        /// Task title
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Due date as YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Edit a task; prompts for every field when no flag is given
    Edit {
        id: TaskId,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Delete a task permanently
    Delete {
        id: TaskId,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Move a task to the archive
    Archive {
        id: TaskId,
    },
    /// Bring a task back from the archive
    Unarchive {
        id: TaskId,
    },
    /// Mark a task done
    Complete {
        id: TaskId,
    },
    /// Search titles and descriptions
    Search {
        query: String,
        /// Search the archive instead of active tasks
        #[arg(long)]
        archived: bool,
        #[arg(long)]
        status: Option<TaskStatus>,
    },
}

pub async fn handle_tasks_command(app: &mut App, command: TasksCommands) -> anyhow::Result<()> {
    match command {
        TasksCommands::List { tab } => list_tasks(app, tab).await,
        TasksCommands::Show { id } => show_task(app, id).await,
        TasksCommands::Add {
            title,
            description,
            due,
            tags,
        } => add_task(app, title, description, due, tags).await,
        TasksCommands::Edit {
            id,
            title,
            description,
            due,
            clear_due,
            tags,
            status,
        } => {
            let patch = TaskUpdateInput {
                title,
                description: description.map(non_blank),
                due_date: match (due, clear_due) {
                    (_, true) => Some(None),
                    (Some(raw), false) => Some(Some(parse_due_date(&raw)?)),
                    (None, false) => None,
                },
                tags: tags.map(non_blank),
                status,
                ..Default::default()
            };
            edit_task(app, id, patch).await
        }
        TasksCommands::Delete { id, yes } => delete_task(app, id, yes).await,
        TasksCommands::Archive { id } => {
            let result = app.client.archive_task(id, true).await;
            let task = app.report(result, "Task archived")?;
            println!("{} {}", task.id.to_string().cyan(), task.title);
            Ok(())
        }
        TasksCommands::Unarchive { id } => {
            let result = app.client.archive_task(id, false).await;
            let task = app.report(result, "Task restored")?;
            println!("{} {}", task.id.to_string().cyan(), task.title);
            Ok(())
        }
        TasksCommands::Complete { id } => {
            let result = app.client.complete_task(id).await;
            let task = app.report(result, "Task completed")?;
            println!("{} {}", task.id.to_string().cyan(), task.title);
            Ok(())
        }
        TasksCommands::Search {
            query,
            archived,
            status,
        } => {
            let mut search = TaskSearch::new(query).archived(archived);
            if let Some(status) = status {
                search = search.status(status);
            }
            search_tasks(app, &search).await
        }
    }
}

fn today() -> chrono::NaiveDate {
    Utc::now().date_naive()
}

async fn list_tasks(app: &mut App, tab: TaskTab) -> anyhow::Result<()> {
    let board = TaskBoard::load(&app.client).await?;

    println!("{}", "📋 Tasks".blue().bold());
    println!("{}", tab_bar(&board.counts(), tab));
    println!();

    let tasks = board.tab(tab);
    if tasks.is_empty() {
        println!("{}", format!("No tasks in {}", tab.label()).yellow());
        if board.is_empty() {
            println!("{}", "Use 'taskmaster tasks add' to create your first task".dimmed());
        }
        return Ok(());
    }

    println!("{}", task_table(&tasks));
    println!("Total: {} tasks", tasks.len().to_string().cyan());
    Ok(())
}

async fn show_task(app: &mut App, id: TaskId) -> anyhow::Result<()> {
    let task = app.client.get_task(id).await?;

    println!("{}", format!("📌 Task Details - {}", task.title).blue().bold());
    println!();
    print_task_details(&task, today());
    Ok(())
}

async fn add_task(
    app: &mut App,
    title: Option<String>,
    description: Option<String>,
    due: Option<String>,
    tags: Option<String>,
) -> anyhow::Result<()> {
    let interactive = title.is_none();
    if interactive {
        println!("{}", "➕ Add New Task".blue().bold());
        println!();
    }

    let title = match title {
        Some(t) => t,
        None => Text::new("Title:").prompt()?,
    };
    let mut input = TaskCreateInput::new(&title)?;

    let description = match description {
        Some(d) => Some(d),
        None if interactive => Some(Text::new("Description (optional):").prompt()?),
        None => None,
    };
    if let Some(description) = description.and_then(non_blank) {
        input = input.description(description);
    }

    let due = match due {
        Some(d) => Some(d),
        None if interactive => Some(Text::new("Due date (YYYY-MM-DD, optional):").prompt()?),
        None => None,
    };
    if let Some(due) = due.and_then(non_blank) {
        input = input.due_date_str(&due)?;
    }

    let tags = match tags {
        Some(t) => Some(t),
        None if interactive => Some(Text::new("Tags (comma-separated, optional):").prompt()?),
        None => None,
    };
    if let Some(tags) = tags {
        input = input.tags(tags);
    }

    let result = app.client.create_task(&input).await;
    let task = app.report(result, "Task added")?;
    println!("ID: {}", task.id.to_string().cyan());
    Ok(())
}

fn format_due_input(due: Option<DateTime<Utc>>) -> String {
    due.map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

async fn edit_task(app: &mut App, id: TaskId, patch: TaskUpdateInput) -> anyhow::Result<()> {
    let patch = if patch.is_empty() {
        prompt_edit(app, id).await?
    } else {
        patch
    };
    if patch.is_empty() {
        println!("{}", "No changes".yellow());
        return Ok(());
    }

    let result = app.client.update_task(id, &patch).await;
    let task = app.report(result, "Task updated")?;
    println!();
    print_task_details(&task, today());
    Ok(())
}

async fn prompt_edit(app: &App, id: TaskId) -> anyhow::Result<TaskUpdateInput> {
    let task = app.client.get_task(id).await?;

    println!("{}", format!("📝 Edit Task - {}", task.title).blue().bold());
    println!();

    let title = Text::new("Title:").with_default(&task.title).prompt()?;
    let description = Text::new("Description:")
        .with_default(task.description.as_deref().unwrap_or(""))
        .prompt()?;

    let due = Text::new("Due date (YYYY-MM-DD, empty to clear):")
        .with_default(&format_due_input(task.due_date))
        .prompt()?;
    let due_date = match non_blank(due) {
        Some(raw) => Some(parse_due_date(&raw)?),
        None => None,
    };

    let tags = Text::new("Tags (comma-separated):")
        .with_default(task.tags.as_deref().unwrap_or(""))
        .prompt()?;

    let statuses = status_choices(task.status);
    let cursor = statuses
        .iter()
        .position(|s| *s == task.status)
        .unwrap_or_default();
    let status = Select::new("Status:", statuses)
        .with_starting_cursor(cursor)
        .prompt()?;

    let answers = EditAnswers {
        title,
        description: Some(description),
        due_date,
        tags: Some(tags),
        status,
    };
    Ok(edit_patch(&task, answers))
}

async fn delete_task(app: &mut App, id: TaskId, skip_confirmation: bool) -> anyhow::Result<()> {
    let task = app.client.get_task(id).await?;

    println!("{}", format!("🗑️  Delete Task - {}", task.title).red().bold());
    println!();
    print_task_details(&task, today());
    println!();

    let confirmed = skip_confirmation
        || Confirm::new(&format!("Are you sure you want to delete '{}'?", task.title))
            .with_default(false)
            .prompt()?;

    if !confirmed {
        println!("{}", "Operation cancelled".yellow());
        return Ok(());
    }

    let result = app.client.delete_task(id).await;
    app.report(result, "Task deleted")
}

async fn search_tasks(app: &mut App, search: &TaskSearch) -> anyhow::Result<()> {
    let found = app.client.search_tasks(search).await?;

    let scope = if search.archived { "archived" } else { "active" };
    println!(
        "{}",
        format!("🔎 Search '{}' in {} tasks", search.query, scope).blue().bold()
    );
    println!();

    if found.is_empty() {
        println!("{}", "No matching tasks".yellow());
        return Ok(());
    }

    let tasks: Vec<_> = found.iter().collect();
    println!("{}", task_table(&tasks));
    println!("Found: {} tasks", found.len().to_string().cyan());
    Ok(())
}
