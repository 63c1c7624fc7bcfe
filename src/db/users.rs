use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::db::roles::get_role;
use crate::error::AppError;
use crate::models::{StatusFilter, User, UserCreate, UserUpdate};
use crate::validation::validate_id;

const COLUMNS: &str =
    "id, username, email, first_name, last_name, contact_number, role_id, is_active, created_at";

#[instrument(skip(pool))]
pub async fn get_users(pool: &Pool<Sqlite>, filter: StatusFilter) -> Result<Vec<User>, AppError> {
    info!("Listing users");
    let query = match filter {
        StatusFilter::All => format!("SELECT {} FROM users", COLUMNS),
        StatusFilter::Active => format!("SELECT {} FROM users WHERE is_active = TRUE", COLUMNS),
        StatusFilter::Inactive => format!("SELECT {} FROM users WHERE is_active = FALSE", COLUMNS),
    };

    Ok(sqlx::query_as::<_, User>(&query).fetch_all(pool).await?)
}

async fn fetch_user(pool: &Pool<Sqlite>, id: i64) -> Result<Option<User>, AppError> {
    let query = format!("SELECT {} FROM users WHERE id = ?", COLUMNS);
    Ok(sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

/// Deactivated users are treated as absent here; they stay visible through
/// the inactive listing filter.
#[instrument(skip(pool))]
pub async fn get_user(pool: &Pool<Sqlite>, id: i64) -> Result<User, AppError> {
    info!("Fetching user by ID");
    match fetch_user(pool, id).await? {
        Some(user) if user.is_active => Ok(user),
        _ => Err(AppError::NotFound(format!("User with id {} not found", id))),
    }
}

/// FK check used by enrollments and completions.
pub(crate) async fn ensure_active_user(
    pool: &Pool<Sqlite>,
    id: i64,
    what: &str,
) -> Result<(), AppError> {
    let found: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM users WHERE id = ? AND is_active = TRUE")
            .bind(validate_id(id)?)
            .fetch_optional(pool)
            .await?;

    match found {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound(format!("{} with id {} not found", what, id))),
    }
}

#[instrument(skip(pool, data))]
pub async fn create_user(pool: &Pool<Sqlite>, data: UserCreate) -> Result<User, AppError> {
    info!("Creating user");
    get_role(pool, validate_id(data.role_id)?).await?;

    let password_hash = bcrypt::hash(&data.password, bcrypt::DEFAULT_COST)?;

    let res = sqlx::query(
        "INSERT INTO users (username, email, first_name, last_name, contact_number, password, role_id)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&data.username)
    .bind(&data.email)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.contact_number)
    .bind(&password_hash)
    .bind(data.role_id)
    .execute(pool)
    .await
    .map_err(|e| AppError::from_write(e, "User"))?;

    get_user(pool, res.last_insert_rowid()).await
}

#[instrument(skip(pool, data))]
pub async fn update_user(pool: &Pool<Sqlite>, id: i64, data: UserUpdate) -> Result<User, AppError> {
    info!("Updating user");
    let existing = fetch_user(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?;

    if let Some(role_id) = data.role_id {
        get_role(pool, validate_id(role_id)?).await?;
    }

    let username = data.username.unwrap_or(existing.username);
    let email = data.email.unwrap_or(existing.email);
    let first_name = data.first_name.unwrap_or(existing.first_name);
    let last_name = data.last_name.unwrap_or(existing.last_name);
    let contact_number = data.contact_number.or(existing.contact_number);
    let role_id = data.role_id.unwrap_or(existing.role_id);
    let is_active = data.is_active.unwrap_or(existing.is_active);

    // Both statements commit or roll back together; a rejected patch must
    // not leave a new password behind.
    let mut tx = pool.begin().await?;

    if let Some(password) = &data.password {
        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
        sqlx::query("UPDATE users SET password = ? WHERE id = ?")
            .bind(&password_hash)
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query(
        "UPDATE users
         SET username = ?, email = ?, first_name = ?, last_name = ?,
             contact_number = ?, role_id = ?, is_active = ?
         WHERE id = ?",
    )
    .bind(&username)
    .bind(&email)
    .bind(&first_name)
    .bind(&last_name)
    .bind(&contact_number)
    .bind(role_id)
    .bind(is_active)
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(|e| AppError::from_write(e, "User"))?;

    tx.commit().await?;

    let updated = fetch_user(pool, id).await?;
    updated.ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
}

/// Users own courses, enrollments and completions, so deletion only
/// deactivates the row.
#[instrument(skip(pool))]
pub async fn delete_user(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deactivating user");
    fetch_user(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?;

    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
