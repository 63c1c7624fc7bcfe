use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::models::{Role, RoleCreate, RoleUpdate, StatusFilter};

#[instrument(skip(pool))]
pub async fn get_roles(pool: &Pool<Sqlite>, filter: StatusFilter) -> Result<Vec<Role>, AppError> {
    info!("Listing roles");
    let query = match filter {
        StatusFilter::All => "SELECT id, name, description, is_active FROM roles",
        StatusFilter::Active => {
            "SELECT id, name, description, is_active FROM roles WHERE is_active = TRUE"
        }
        StatusFilter::Inactive => {
            "SELECT id, name, description, is_active FROM roles WHERE is_active = FALSE"
        }
    };

    Ok(sqlx::query_as::<_, Role>(query).fetch_all(pool).await?)
}

#[instrument(skip(pool))]
pub async fn get_role(pool: &Pool<Sqlite>, id: i64) -> Result<Role, AppError> {
    info!("Fetching role by ID");
    let row = sqlx::query_as::<_, Role>("SELECT id, name, description, is_active FROM roles WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.ok_or_else(|| AppError::NotFound(format!("Role with id {} not found", id)))
}

#[instrument(skip(pool))]
pub async fn create_role(pool: &Pool<Sqlite>, data: RoleCreate) -> Result<Role, AppError> {
    info!("Creating role");
    let res = sqlx::query("INSERT INTO roles (name, description) VALUES (?, ?)")
        .bind(&data.name)
        .bind(&data.description)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_write(e, "Role"))?;

    get_role(pool, res.last_insert_rowid()).await
}

#[instrument(skip(pool, data))]
pub async fn update_role(
    pool: &Pool<Sqlite>,
    id: i64,
    data: RoleUpdate,
) -> Result<Role, AppError> {
    info!("Updating role");
    let existing = get_role(pool, id).await?;

    let name = data.name.unwrap_or(existing.name);
    let description = data.description.or(existing.description);
    let is_active = data.is_active.unwrap_or(existing.is_active);

    sqlx::query("UPDATE roles SET name = ?, description = ?, is_active = ? WHERE id = ?")
        .bind(&name)
        .bind(&description)
        .bind(is_active)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_write(e, "Role"))?;

    get_role(pool, id).await
}

/// Roles are referenced by users, so deletion only deactivates the row.
#[instrument(skip(pool))]
pub async fn delete_role(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deactivating role");
    get_role(pool, id).await?;

    sqlx::query("UPDATE roles SET is_active = FALSE WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
