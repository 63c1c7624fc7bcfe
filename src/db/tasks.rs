use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::db::categories::ensure_active_category;
use crate::db::courses::ensure_active_course;
use crate::error::AppError;
use crate::models::{Task, TaskCreate, TaskUpdate};
use crate::validation::validate_id;

const COLUMNS: &str = "id, title, description, course_id, category_id, parent_id, is_active";

/// The role allowed to create tasks.
const ADMIN_ROLE: &str = "admin";

/// Singleton category assigned to tasks created without one.
const UNCATEGORIZED: &str = "Uncategorized";

#[instrument(skip(pool))]
pub async fn get_tasks(pool: &Pool<Sqlite>) -> Result<Vec<Task>, AppError> {
    info!("Listing tasks");
    let query = format!("SELECT {} FROM tasks", COLUMNS);

    Ok(sqlx::query_as::<_, Task>(&query).fetch_all(pool).await?)
}

#[instrument(skip(pool))]
pub async fn get_task(pool: &Pool<Sqlite>, id: i64) -> Result<Task, AppError> {
    info!("Fetching task by ID");
    let query = format!("SELECT {} FROM tasks WHERE id = ?", COLUMNS);
    let row = sqlx::query_as::<_, Task>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.ok_or_else(|| AppError::NotFound(format!("Task with id {} not found", id)))
}

/// FK check used by completions.
pub(crate) async fn ensure_active_task(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    let found: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM tasks WHERE id = ? AND is_active = TRUE")
            .bind(validate_id(id)?)
            .fetch_optional(pool)
            .await?;

    match found {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound(format!("Task with id {} not found", id))),
    }
}

async fn require_admin(pool: &Pool<Sqlite>, user_id: i64) -> Result<(), AppError> {
    let role: Option<(String,)> = sqlx::query_as(
        "SELECT r.name FROM users u
         JOIN roles r ON r.id = u.role_id
         WHERE u.id = ? AND u.is_active = TRUE",
    )
    .bind(validate_id(user_id)?)
    .fetch_optional(pool)
    .await?;

    match role {
        None => Err(AppError::NotFound(format!(
            "User with id {} not found",
            user_id
        ))),
        Some((name,)) if name == ADMIN_ROLE => Ok(()),
        Some(_) => Err(AppError::Authorization(
            "Only administrators can create tasks".to_string(),
        )),
    }
}

/// Creates a task on behalf of `data.created_by`, who must hold the admin
/// role. When no category is given, the "Uncategorized" singleton is looked
/// up and lazily inserted in the same transaction as the task insert, so
/// callers must not assume it pre-exists.
#[instrument(skip(pool, data))]
pub async fn create_task(pool: &Pool<Sqlite>, data: TaskCreate) -> Result<Task, AppError> {
    info!("Creating task");
    require_admin(pool, data.created_by).await?;
    ensure_active_course(pool, data.course_id).await?;

    if let Some(parent_id) = data.parent_id {
        get_task(pool, validate_id(parent_id)?).await?;
    }
    if let Some(category_id) = data.category_id {
        ensure_active_category(pool, validate_id(category_id)?).await?;
    }

    let mut tx = pool.begin().await?;

    let category_id = match data.category_id {
        Some(id) => id,
        None => {
            let existing: Option<(i64,)> =
                sqlx::query_as("SELECT id FROM categories WHERE name = ?")
                    .bind(UNCATEGORIZED)
                    .fetch_optional(&mut *tx)
                    .await?;

            match existing {
                Some((id,)) => id,
                None => {
                    info!("Creating the {} category", UNCATEGORIZED);
                    sqlx::query("INSERT INTO categories (name, description) VALUES (?, ?)")
                        .bind(UNCATEGORIZED)
                        .bind("Default category for uncategorized tasks")
                        .execute(&mut *tx)
                        .await?
                        .last_insert_rowid()
                }
            }
        }
    };

    let res = sqlx::query(
        "INSERT INTO tasks (title, description, course_id, category_id, parent_id)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&data.title)
    .bind(&data.description)
    .bind(data.course_id)
    .bind(category_id)
    .bind(data.parent_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| AppError::from_write(e, "Task"))?;

    let task_id = res.last_insert_rowid();
    tx.commit().await?;

    get_task(pool, task_id).await
}

/// Walks the proposed parent's ancestor chain; a task must not become its
/// own ancestor.
async fn assert_no_cycle(pool: &Pool<Sqlite>, task_id: i64, parent_id: i64) -> Result<(), AppError> {
    let mut current = Some(parent_id);
    while let Some(id) = current {
        if id == task_id {
            return Err(AppError::Validation(
                "Task cannot become its own ancestor".to_string(),
            ));
        }
        current = sqlx::query_scalar::<_, Option<i64>>("SELECT parent_id FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .flatten();
    }

    Ok(())
}

#[instrument(skip(pool, data))]
pub async fn update_task(pool: &Pool<Sqlite>, id: i64, data: TaskUpdate) -> Result<Task, AppError> {
    info!("Updating task");
    let existing = get_task(pool, id).await?;

    if let Some(category_id) = data.category_id {
        ensure_active_category(pool, validate_id(category_id)?).await?;
    }
    if let Some(parent_id) = data.parent_id {
        get_task(pool, validate_id(parent_id)?).await?;
        assert_no_cycle(pool, id, parent_id).await?;
    }

    let title = data.title.unwrap_or(existing.title);
    let description = data.description.or(existing.description);
    let category_id = data.category_id.unwrap_or(existing.category_id);
    let parent_id = data.parent_id.or(existing.parent_id);
    let is_active = data.is_active.unwrap_or(existing.is_active);

    sqlx::query(
        "UPDATE tasks
         SET title = ?, description = ?, category_id = ?, parent_id = ?, is_active = ?
         WHERE id = ?",
    )
    .bind(&title)
    .bind(&description)
    .bind(category_id)
    .bind(parent_id)
    .bind(is_active)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| AppError::from_write(e, "Task"))?;

    get_task(pool, id).await
}

/// Tasks own completions and subtasks, so deletion only deactivates the row.
#[instrument(skip(pool))]
pub async fn delete_task(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deactivating task");
    get_task(pool, id).await?;

    sqlx::query("UPDATE tasks SET is_active = FALSE WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
