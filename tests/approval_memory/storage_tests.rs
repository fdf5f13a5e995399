//! In-memory storage contract tests.

use super::helpers::{login, sample_task, storage};
use eyre::ensure;
use mockable::DefaultClock;
use rstest::rstest;
use signoff::approval::{
    adapters::memory::InMemoryTaskStorage,
    domain::{TaskId, TaskStatus},
    ports::{TaskStorage, TaskStorageError},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn insert_rejects_duplicate_identifier(
    storage: InMemoryTaskStorage,
) -> Result<(), eyre::Report> {
    let task = sample_task("author", &["a1"])?;
    storage.insert(&task).await?;

    let result = storage.insert(&task).await;

    ensure!(
        matches!(result, Err(TaskStorageError::DuplicateTask(id)) if id == task.id()),
        "expected duplicate error, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_replaces_existing_and_inserts_missing(
    storage: InMemoryTaskStorage,
) -> Result<(), eyre::Report> {
    let mut task = sample_task("author", &["a1", "a2"])?;
    storage.update(&task).await?;
    ensure!(storage.find_by_id(task.id()).await?.as_ref() == Some(&task));

    task.decline(&login("a1")?, &DefaultClock)?;
    storage.update(&task).await?;

    let stored = storage
        .find_by_id(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task should be stored"))?;
    ensure!(stored.status() == TaskStatus::Declined);
    ensure!(storage.list_all().await?.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_of_missing_task_reports_not_found(
    storage: InMemoryTaskStorage,
) -> Result<(), eyre::Report> {
    let missing = TaskId::new();

    let result = storage.delete(missing).await;

    ensure!(
        matches!(result, Err(TaskStorageError::NotFound(id)) if id == missing),
        "expected not found, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_returns_tasks_in_creation_order(
    storage: InMemoryTaskStorage,
) -> Result<(), eyre::Report> {
    let first = sample_task("author", &["a1"])?;
    let second = sample_task("author", &["a2"])?;
    let third = sample_task("other", &["a3"])?;
    storage.insert(&third).await?;
    storage.insert(&first).await?;
    storage.insert(&second).await?;

    let listed: Vec<TaskId> = storage.list_all().await?.iter().map(|t| t.id()).collect();

    let mut expected = vec![first, second, third];
    expected.sort_by_key(|task| (task.created_at(), task.id().into_inner()));
    let expected_ids: Vec<TaskId> = expected.iter().map(|t| t.id()).collect();
    ensure!(listed == expected_ids, "unexpected order {listed:?}");
    Ok(())
}
