#[macro_use]
extern crate rocket;

mod api;
mod database;
mod db;
mod env;
mod error;
mod models;
mod telemetry;
#[cfg(test)]
mod test;
mod validation;

use api::{
    api_create_category, api_create_completion, api_create_course, api_create_enrollment,
    api_create_role, api_create_status, api_create_task, api_create_user, api_delete_category,
    api_delete_completion, api_delete_course, api_delete_enrollment, api_delete_role,
    api_delete_status, api_delete_task, api_delete_user, api_get_categories, api_get_category,
    api_get_completion, api_get_completions, api_get_course, api_get_courses, api_get_enrollment,
    api_get_enrollments, api_get_role, api_get_roles, api_get_status, api_get_statuses,
    api_get_student_progress, api_get_task, api_get_tasks, api_get_user, api_get_users,
    api_update_category, api_update_completion, api_update_course, api_update_enrollment,
    api_update_role, api_update_status, api_update_task, api_update_user,
};
use database::init_db;
use rocket::{Build, Rocket};
use sqlx::SqlitePool;
use telemetry::TelemetryFairing;
use telemetry::init_tracing;
use tracing::{error, info};

#[launch]
async fn rocket() -> _ {
    init_tracing();

    if let Err(e) = env::load_environment() {
        error!("Failed to load environment files: {}", e);
    }

    let database_url = std::env::var("DATABASE_URL").unwrap_or_default();

    let pool = SqlitePool::connect(&database_url)
        .await
        .expect("Failed to connect to SQLite database");

    info!("Initializing database...");
    match init_db(&pool).await {
        Ok(_) => info!("Database initialization completed"),
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            panic!("Database initialization failed: {}", e);
        }
    }

    init_rocket(pool).await
}

pub async fn init_rocket(pool: SqlitePool) -> Rocket<Build> {
    info!("Starting course manager");

    rocket::build()
        .manage(pool)
        .mount(
            "/",
            routes![
                api_get_statuses,
                api_create_status,
                api_get_status,
                api_update_status,
                api_delete_status,
                api_get_roles,
                api_create_role,
                api_get_role,
                api_update_role,
                api_delete_role,
                api_get_categories,
                api_create_category,
                api_get_category,
                api_update_category,
                api_delete_category,
                api_get_users,
                api_create_user,
                api_get_user,
                api_update_user,
                api_delete_user,
                api_get_courses,
                api_create_course,
                api_get_course,
                api_update_course,
                api_delete_course,
                api_get_tasks,
                api_create_task,
                api_get_task,
                api_update_task,
                api_delete_task,
                api_get_enrollments,
                api_create_enrollment,
                api_get_enrollment,
                api_update_enrollment,
                api_delete_enrollment,
                api_get_student_progress,
                api_get_completions,
                api_create_completion,
                api_get_completion,
                api_update_completion,
                api_delete_completion,
            ],
        )
        .attach(TelemetryFairing)
}
