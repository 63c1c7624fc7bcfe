use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::models::{StatusCreate, StatusRow, StatusUpdate};

#[instrument(skip(pool))]
pub async fn get_statuses(pool: &Pool<Sqlite>) -> Result<Vec<StatusRow>, AppError> {
    info!("Listing statuses");
    Ok(
        sqlx::query_as::<_, StatusRow>("SELECT id, name, description FROM statuses")
            .fetch_all(pool)
            .await?,
    )
}

#[instrument(skip(pool))]
pub async fn get_status(pool: &Pool<Sqlite>, id: i64) -> Result<StatusRow, AppError> {
    info!("Fetching status by ID");
    let row =
        sqlx::query_as::<_, StatusRow>("SELECT id, name, description FROM statuses WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    row.ok_or_else(|| AppError::NotFound(format!("Status with id {} not found", id)))
}

#[instrument(skip(pool))]
pub async fn create_status(pool: &Pool<Sqlite>, data: StatusCreate) -> Result<StatusRow, AppError> {
    info!("Creating status");
    let res = sqlx::query("INSERT INTO statuses (name, description) VALUES (?, ?)")
        .bind(&data.name)
        .bind(&data.description)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_write(e, "Status"))?;

    get_status(pool, res.last_insert_rowid()).await
}

#[instrument(skip(pool, data))]
pub async fn update_status(
    pool: &Pool<Sqlite>,
    id: i64,
    data: StatusUpdate,
) -> Result<StatusRow, AppError> {
    info!("Updating status");
    let existing = get_status(pool, id).await?;

    let name = data.name.unwrap_or(existing.name);
    let description = data.description.or(existing.description);

    sqlx::query("UPDATE statuses SET name = ?, description = ? WHERE id = ?")
        .bind(&name)
        .bind(&description)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_write(e, "Status"))?;

    get_status(pool, id).await
}

/// Statuses are a leaf lookup table; deletion removes the row.
#[instrument(skip(pool))]
pub async fn delete_status(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting status");
    get_status(pool, id).await?;

    sqlx::query("DELETE FROM statuses WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
