use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::db::tasks::ensure_active_task;
use crate::db::users::ensure_active_user;
use crate::error::AppError;
use crate::models::{Completion, CompletionCreate, CompletionUpdate};

const COLUMNS: &str = "id, task_id, student_id, completed_at";

#[instrument(skip(pool))]
pub async fn get_completions(pool: &Pool<Sqlite>) -> Result<Vec<Completion>, AppError> {
    info!("Listing completions");
    let query = format!("SELECT {} FROM completions", COLUMNS);

    Ok(sqlx::query_as::<_, Completion>(&query)
        .fetch_all(pool)
        .await?)
}

#[instrument(skip(pool))]
pub async fn get_completion(pool: &Pool<Sqlite>, id: i64) -> Result<Completion, AppError> {
    info!("Fetching completion by ID");
    let query = format!("SELECT {} FROM completions WHERE id = ?", COLUMNS);
    let row = sqlx::query_as::<_, Completion>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.ok_or_else(|| AppError::NotFound(format!("Completion with id {} not found", id)))
}

#[instrument(skip(pool, data))]
pub async fn create_completion(
    pool: &Pool<Sqlite>,
    data: CompletionCreate,
) -> Result<Completion, AppError> {
    info!("Creating completion");
    ensure_active_task(pool, data.task_id).await?;
    ensure_active_user(pool, data.student_id, "Student").await?;

    let res = sqlx::query(
        "INSERT INTO completions (task_id, student_id, completed_at) VALUES (?, ?, ?)",
    )
    .bind(data.task_id)
    .bind(data.student_id)
    .bind(data.completed_at)
    .execute(pool)
    .await
    .map_err(|e| AppError::from_write(e, "Completion"))?;

    get_completion(pool, res.last_insert_rowid()).await
}

#[instrument(skip(pool, data))]
pub async fn update_completion(
    pool: &Pool<Sqlite>,
    id: i64,
    data: CompletionUpdate,
) -> Result<Completion, AppError> {
    info!("Updating completion");
    let existing = get_completion(pool, id).await?;

    if let Some(task_id) = data.task_id {
        ensure_active_task(pool, task_id).await?;
    }
    if let Some(student_id) = data.student_id {
        ensure_active_user(pool, student_id, "Student").await?;
    }

    let task_id = data.task_id.unwrap_or(existing.task_id);
    let student_id = data.student_id.unwrap_or(existing.student_id);
    let completed_at = data.completed_at.or(existing.completed_at);

    sqlx::query("UPDATE completions SET task_id = ?, student_id = ?, completed_at = ? WHERE id = ?")
        .bind(task_id)
        .bind(student_id)
        .bind(completed_at)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_write(e, "Completion"))?;

    get_completion(pool, id).await
}

/// Completions are leaf rows with no dependents; deletion removes the row.
#[instrument(skip(pool))]
pub async fn delete_completion(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting completion");
    get_completion(pool, id).await?;

    sqlx::query("DELETE FROM completions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
