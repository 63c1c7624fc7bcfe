use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::error::AppError;

use super::schema::CURRENT_SCHEMA;

/// Creates the full schema (idempotent) and seeds the default roles and the
/// root user on first run. Re-running against a populated database is a
/// no-op.
#[instrument(skip(pool))]
pub async fn init_db(pool: &Pool<Sqlite>) -> Result<(), AppError> {
    info!("Initializing database schema");
    sqlx::raw_sql(CURRENT_SCHEMA).execute(pool).await?;

    let admin_role: Option<(i64,)> = sqlx::query_as("SELECT id FROM roles WHERE name = 'admin'")
        .fetch_optional(pool)
        .await?;

    if admin_role.is_some() {
        info!("Database already contains default data, skipping seeding");
        return Ok(());
    }

    info!("Seeding default roles and root user");
    let mut tx = pool.begin().await?;

    let admin_id = sqlx::query("INSERT INTO roles (name, description) VALUES (?, ?)")
        .bind("admin")
        .bind("Administrator")
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    for (name, description) in [("teacher", "Teacher"), ("student", "Student")] {
        sqlx::query("INSERT INTO roles (name, description) VALUES (?, ?)")
            .bind(name)
            .bind(description)
            .execute(&mut *tx)
            .await?;
    }

    let password_hash = bcrypt::hash("root", bcrypt::DEFAULT_COST)?;
    sqlx::query(
        "INSERT INTO users (username, email, first_name, last_name, password, role_id)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind("root")
    .bind("root@root.root")
    .bind("Root")
    .bind("Root")
    .bind(password_hash)
    .bind(admin_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    info!("Database initialized with default data");

    Ok(())
}
