use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::models::{Category, CategoryCreate, CategoryUpdate};

const COLUMNS: &str = "id, name, description, is_active";

#[instrument(skip(pool))]
pub async fn get_categories(pool: &Pool<Sqlite>) -> Result<Vec<Category>, AppError> {
    info!("Listing active categories");
    let query = format!("SELECT {} FROM categories WHERE is_active = TRUE", COLUMNS);

    Ok(sqlx::query_as::<_, Category>(&query).fetch_all(pool).await?)
}

#[instrument(skip(pool))]
pub async fn get_category(pool: &Pool<Sqlite>, id: i64) -> Result<Category, AppError> {
    info!("Fetching category by ID");
    let query = format!("SELECT {} FROM categories WHERE id = ?", COLUMNS);
    let row = sqlx::query_as::<_, Category>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))
}

/// FK check used by courses and tasks: the referenced category must exist
/// and still be active.
pub(crate) async fn ensure_active_category(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    let found: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM categories WHERE id = ? AND is_active = TRUE")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    match found {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound(format!(
            "Category with id {} not found",
            id
        ))),
    }
}

#[instrument(skip(pool))]
pub async fn create_category(
    pool: &Pool<Sqlite>,
    data: CategoryCreate,
) -> Result<Category, AppError> {
    info!("Creating category");
    let res = sqlx::query("INSERT INTO categories (name, description) VALUES (?, ?)")
        .bind(&data.name)
        .bind(&data.description)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_write(e, "Category"))?;

    get_category(pool, res.last_insert_rowid()).await
}

#[instrument(skip(pool, data))]
pub async fn update_category(
    pool: &Pool<Sqlite>,
    id: i64,
    data: CategoryUpdate,
) -> Result<Category, AppError> {
    info!("Updating category");
    let existing = get_category(pool, id).await?;

    let name = data.name.unwrap_or(existing.name);
    let description = data.description.or(existing.description);
    let is_active = data.is_active.unwrap_or(existing.is_active);

    sqlx::query("UPDATE categories SET name = ?, description = ?, is_active = ? WHERE id = ?")
        .bind(&name)
        .bind(&description)
        .bind(is_active)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_write(e, "Category"))?;

    get_category(pool, id).await
}

/// Categories are referenced by courses and tasks, so deletion only
/// deactivates the row.
#[instrument(skip(pool))]
pub async fn delete_category(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deactivating category");
    get_category(pool, id).await?;

    sqlx::query("UPDATE categories SET is_active = FALSE WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
