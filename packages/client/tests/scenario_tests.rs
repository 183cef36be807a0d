// ABOUTME: End-to-end flows against the in-memory fake task API
// ABOUTME: Login, create, complete, archive and search across a whole session

mod common;

use chrono::NaiveDate;
use common::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use taskmaster_core::datetime::parse_due_date;

use taskmaster_client::{
    MemorySessionStore, TaskBoard, TaskCreateInput, TaskSearch, TaskStatus, TaskTab,
    TaskUpdateInput,
};

#[tokio::test]
async fn test_task_lifecycle() {
    let (server, api) = FakeTaskApi::start().await;
    let (session, client) = connect_with(&server, Arc::new(MemorySessionStore::new())).await;

    session.login(EMAIL, PASSWORD).await.unwrap();

    let created = client
        .create_task(&TaskCreateInput::new("Buy milk").unwrap())
        .await
        .unwrap();
    assert_eq!(created.status, TaskStatus::Todo);
    assert!(!created.archived);

    let completed = client.complete_task(created.id).await.unwrap();
    assert_eq!(completed.status, TaskStatus::Done);
    assert!(completed.done);
    assert!(completed.completed_at.is_some());

    let archived = client.archive_task(created.id, true).await.unwrap();
    assert!(archived.archived);
    assert_eq!(archived.status, TaskStatus::Done);

    assert!(client.list_tasks(false).await.unwrap().is_empty());
    let shelved = client.list_tasks(true).await.unwrap();
    assert_eq!(shelved.len(), 1);
    assert_eq!(shelved[0].id, created.id);

    let restored = client.archive_task(created.id, false).await.unwrap();
    assert!(!restored.archived);
    assert_eq!(restored.status, TaskStatus::Done);

    client.delete_task(created.id).await.unwrap();
    assert_eq!(api.task_count(), 0);
    assert!(client.get_task(created.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_due_date_keeps_calendar_day() {
    let (server, _api) = FakeTaskApi::start().await;
    let (_, client) = signed_in(&server).await;

    let input = TaskCreateInput::new("File taxes")
        .unwrap()
        .due_date_str("2024-05-01")
        .unwrap();
    let created = client.create_task(&input).await.unwrap();

    let listed = client.list_tasks(false).await.unwrap();
    assert_eq!(listed[0].due_day(), NaiveDate::from_ymd_opt(2024, 5, 1));

    let fetched = client.get_task(created.id).await.unwrap();
    assert_eq!(fetched.due_date_label().as_deref(), Some("May 1, 2024"));

    let moved = client
        .update_task(
            created.id,
            &TaskUpdateInput {
                due_date: Some(Some(parse_due_date("2024-12-31").unwrap())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.due_day(), NaiveDate::from_ymd_opt(2024, 12, 31));

    let cleared = client
        .update_task(
            created.id,
            &TaskUpdateInput {
                due_date: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.due_date.is_none());
}

#[tokio::test]
async fn test_board_tabs_follow_server_state() {
    let (server, _api) = FakeTaskApi::start().await;
    let (_, client) = signed_in(&server).await;

    for title in ["Buy milk", "Walk dog", "Write report"] {
        client
            .create_task(&TaskCreateInput::new(title).unwrap())
            .await
            .unwrap();
    }
    let tasks = client.list_tasks(false).await.unwrap();
    client
        .update_task(tasks[1].id, &TaskUpdateInput::with_status(TaskStatus::InProgress))
        .await
        .unwrap();
    client.complete_task(tasks[2].id).await.unwrap();
    client.archive_task(tasks[2].id, true).await.unwrap();

    let board = TaskBoard::load(&client).await.unwrap();
    let titles = |tab| {
        board
            .tab(tab)
            .iter()
            .map(|t| t.title.clone())
            .collect::<Vec<_>>()
    };

    assert_eq!(titles(TaskTab::All), vec!["Buy milk", "Walk dog"]);
    assert_eq!(titles(TaskTab::Todo), vec!["Buy milk"]);
    assert_eq!(titles(TaskTab::InProgress), vec!["Walk dog"]);
    assert!(titles(TaskTab::Done).is_empty());
    assert_eq!(titles(TaskTab::Archived), vec!["Write report"]);
}

#[tokio::test]
async fn test_search_respects_archive_flag() {
    let (server, _api) = FakeTaskApi::start().await;
    let (_, client) = signed_in(&server).await;

    let milk = client
        .create_task(&TaskCreateInput::new("Buy milk").unwrap())
        .await
        .unwrap();
    client
        .create_task(
            &TaskCreateInput::new("Groceries")
                .unwrap()
                .description("milk and eggs"),
        )
        .await
        .unwrap();
    client.archive_task(milk.id, true).await.unwrap();

    let active = client.search_tasks(&TaskSearch::new("MILK")).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].title, "Groceries");

    let shelved = client
        .search_tasks(&TaskSearch::new("milk").archived(true))
        .await
        .unwrap();
    assert_eq!(shelved.len(), 1);
    assert_eq!(shelved[0].id, milk.id);
}

#[tokio::test]
async fn test_logout_stops_authenticating_requests() {
    let (server, _api) = FakeTaskApi::start().await;
    let (session, client) = signed_in(&server).await;

    assert!(client.list_tasks(false).await.is_ok());

    session.logout().await.unwrap();
    let err = client.list_tasks(false).await.unwrap_err();
    assert!(err.is_auth_error());
}
