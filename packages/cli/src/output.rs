// ABOUTME: Terminal rendering for tasks, tabs and notices
// ABOUTME: Tables via comfy-table, colours via colored

use chrono::{DateTime, NaiveDate, Utc};
use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use taskmaster_client::{Notice, NoticeKind};
use taskmaster_core::{Task, TaskStatus, TaskTab};

const TITLE_WIDTH: usize = 40;
const TAGS_WIDTH: usize = 24;
const EMPTY: &str = "—";

pub fn status_badge(status: TaskStatus) -> ColoredString {
    match status {
        TaskStatus::Todo => status.label().yellow(),
        TaskStatus::InProgress => status.label().blue(),
        TaskStatus::Done => status.label().green(),
        TaskStatus::Archived => status.label().dimmed(),
    }
}

/// Short calendar date, e.g. `5/1/2024`
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|dt| dt.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| EMPTY.to_string())
}

/// Cut `s` to at most `max_len` characters, ending in `...` when shortened
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn tags_cell(task: &Task) -> String {
    let tags = task.tag_list();
    if tags.is_empty() {
        EMPTY.to_string()
    } else {
        tags.join(", ")
    }
}

/// Tags as `#tag` badges
pub fn tag_badges(task: &Task) -> String {
    task.tag_list()
        .iter()
        .map(|tag| format!("#{}", tag))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plain-text table rows: ID, title, status, due, tags, created
pub fn task_rows(tasks: &[&Task]) -> Vec<Vec<String>> {
    tasks
        .iter()
        .map(|task| {
            vec![
                task.id.to_string(),
                truncate(&task.title, TITLE_WIDTH),
                task.status.label().to_string(),
                format_date(task.due_date),
                truncate(&tags_cell(task), TAGS_WIDTH),
                format_date(task.created_at),
            ]
        })
        .collect()
}

pub fn task_table(tasks: &[&Task]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec!["ID", "Title", "Status", "Due", "Tags", "Created"]);
    for row in task_rows(tasks) {
        table.add_row(row);
    }
    table
}

/// One line listing every tab with its count, the selected one highlighted
pub fn tab_bar(counts: &[(TaskTab, usize)], selected: TaskTab) -> String {
    counts
        .iter()
        .map(|(tab, count)| {
            let label = format!("{} ({})", tab.label(), count);
            if *tab == selected {
                label.bold().underline().to_string()
            } else {
                label.dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn print_task_details(task: &Task, today: NaiveDate) {
    println!("{:<14} {}", "ID:".cyan(), task.id);
    println!("{:<14} {}", "Title:".cyan(), task.title);
    println!("{:<14} {}", "Status:".cyan(), status_badge(task.status));

    if task.archived {
        println!("{:<14} {}", "Archived:".cyan(), "yes".yellow());
    }

    if let Some(description) = task.description.as_deref() {
        if !description.trim().is_empty() {
            println!("{:<14} {}", "Description:".cyan(), description);
        }
    }

    if let Some(due) = task.due_date_label() {
        let due = if task.is_overdue(today) {
            format!("{} (overdue)", due).red()
        } else {
            due.normal()
        };
        println!("{:<14} {}", "Due:".cyan(), due);
    }

    if !task.tag_list().is_empty() {
        println!("{:<14} {}", "Tags:".cyan(), tag_badges(task).magenta());
    }

    println!("{:<14} {}", "Created:".cyan(), format_date(task.created_at));
    if task.completed_at.is_some() {
        println!("{:<14} {}", "Completed:".cyan(), format_date(task.completed_at));
    }
}

pub fn render_notice(notice: &Notice) -> String {
    match notice.kind {
        NoticeKind::Success => format!("{} {}", "✓".green().bold(), notice.message.green()),
        NoticeKind::Error => format!("{} {}", "✗".red().bold(), notice.message.red()),
    }
}
