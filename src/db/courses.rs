use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::db::categories::ensure_active_category;
use crate::db::users::ensure_active_user;
use crate::error::AppError;
use crate::models::{Course, CourseCreate, CourseUpdate};
use crate::validation::validate_id;

const COLUMNS: &str = "id, title, description, category_id, creator_id, is_active, created_at";

#[instrument(skip(pool))]
pub async fn get_courses(pool: &Pool<Sqlite>) -> Result<Vec<Course>, AppError> {
    info!("Listing courses");
    let query = format!("SELECT {} FROM courses", COLUMNS);

    Ok(sqlx::query_as::<_, Course>(&query).fetch_all(pool).await?)
}

#[instrument(skip(pool))]
pub async fn get_course(pool: &Pool<Sqlite>, id: i64) -> Result<Course, AppError> {
    info!("Fetching course by ID");
    let query = format!("SELECT {} FROM courses WHERE id = ?", COLUMNS);
    let row = sqlx::query_as::<_, Course>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.ok_or_else(|| AppError::NotFound(format!("Course with id {} not found", id)))
}

/// FK check used by tasks and enrollments.
pub(crate) async fn ensure_active_course(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    let found: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM courses WHERE id = ? AND is_active = TRUE")
            .bind(validate_id(id)?)
            .fetch_optional(pool)
            .await?;

    match found {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound(format!(
            "Course with id {} not found",
            id
        ))),
    }
}

#[instrument(skip(pool, data))]
pub async fn create_course(pool: &Pool<Sqlite>, data: CourseCreate) -> Result<Course, AppError> {
    info!("Creating course");
    ensure_active_category(pool, validate_id(data.category_id)?).await?;
    if let Some(creator_id) = data.creator_id {
        ensure_active_user(pool, creator_id, "Creator").await?;
    }

    let res = sqlx::query(
        "INSERT INTO courses (title, description, category_id, creator_id) VALUES (?, ?, ?, ?)",
    )
    .bind(&data.title)
    .bind(&data.description)
    .bind(data.category_id)
    .bind(data.creator_id)
    .execute(pool)
    .await
    .map_err(|e| AppError::from_write(e, "Course"))?;

    get_course(pool, res.last_insert_rowid()).await
}

#[instrument(skip(pool, data))]
pub async fn update_course(
    pool: &Pool<Sqlite>,
    id: i64,
    data: CourseUpdate,
) -> Result<Course, AppError> {
    info!("Updating course");
    let existing = get_course(pool, id).await?;

    if let Some(category_id) = data.category_id {
        ensure_active_category(pool, validate_id(category_id)?).await?;
    }
    if let Some(creator_id) = data.creator_id {
        ensure_active_user(pool, creator_id, "Creator").await?;
    }

    let title = data.title.unwrap_or(existing.title);
    let description = data.description.or(existing.description);
    let category_id = data.category_id.unwrap_or(existing.category_id);
    let creator_id = data.creator_id.or(existing.creator_id);
    let is_active = data.is_active.unwrap_or(existing.is_active);

    sqlx::query(
        "UPDATE courses
         SET title = ?, description = ?, category_id = ?, creator_id = ?, is_active = ?
         WHERE id = ?",
    )
    .bind(&title)
    .bind(&description)
    .bind(category_id)
    .bind(creator_id)
    .bind(is_active)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| AppError::from_write(e, "Course"))?;

    get_course(pool, id).await
}

/// Courses own tasks and enrollments, so deletion only deactivates the row.
#[instrument(skip(pool))]
pub async fn delete_course(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deactivating course");
    get_course(pool, id).await?;

    sqlx::query("UPDATE courses SET is_active = FALSE WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
