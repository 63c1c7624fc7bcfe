use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use sqlx::{Pool, Sqlite};

use crate::db::{create_task, delete_task, get_task, get_tasks, update_task};
use crate::error::AppError;
use crate::models::{Task, TaskCreate, TaskUpdate};
use crate::validation::{AppErrorExt, JsonValidateExt, ValidationResponse, validate_id};

#[get("/tasks")]
pub async fn api_get_tasks(db: &State<Pool<Sqlite>>) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(get_tasks(db).await?))
}

#[post("/tasks", data = "<task>")]
pub async fn api_create_task(
    task: Json<TaskCreate>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Task>, Custom<Json<ValidationResponse>>> {
    let validated = task.validate_custom()?;
    let created = create_task(db, validated).await.validate_custom()?;
    Ok(Json(created))
}

#[get("/tasks/<id>")]
pub async fn api_get_task(id: i64, db: &State<Pool<Sqlite>>) -> Result<Json<Task>, AppError> {
    let id = validate_id(id)?;
    Ok(Json(get_task(db, id).await?))
}

#[put("/tasks/<id>", data = "<task>")]
pub async fn api_update_task(
    id: i64,
    task: Json<TaskUpdate>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Task>, Custom<Json<ValidationResponse>>> {
    let id = validate_id(id).validate_custom()?;
    let validated = task.validate_custom()?;
    let updated = update_task(db, id, validated).await.validate_custom()?;
    Ok(Json(updated))
}

#[delete("/tasks/<id>")]
pub async fn api_delete_task(id: i64, db: &State<Pool<Sqlite>>) -> Result<Status, AppError> {
    let id = validate_id(id)?;
    delete_task(db, id).await?;
    Ok(Status::NoContent)
}
