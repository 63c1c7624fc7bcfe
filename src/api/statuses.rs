use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use sqlx::{Pool, Sqlite};

use crate::db::{create_status, delete_status, get_status, get_statuses, update_status};
use crate::error::AppError;
use crate::models::{StatusCreate, StatusRow, StatusUpdate};
use crate::validation::{AppErrorExt, JsonValidateExt, ValidationResponse, validate_id};

#[get("/statuses")]
pub async fn api_get_statuses(db: &State<Pool<Sqlite>>) -> Result<Json<Vec<StatusRow>>, AppError> {
    Ok(Json(get_statuses(db).await?))
}

#[post("/statuses", data = "<status>")]
pub async fn api_create_status(
    status: Json<StatusCreate>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<StatusRow>, Custom<Json<ValidationResponse>>> {
    let validated = status.validate_custom()?;
    let created = create_status(db, validated).await.validate_custom()?;
    Ok(Json(created))
}

#[get("/statuses/<id>")]
pub async fn api_get_status(id: i64, db: &State<Pool<Sqlite>>) -> Result<Json<StatusRow>, AppError> {
    let id = validate_id(id)?;
    Ok(Json(get_status(db, id).await?))
}

#[put("/statuses/<id>", data = "<status>")]
pub async fn api_update_status(
    id: i64,
    status: Json<StatusUpdate>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<StatusRow>, Custom<Json<ValidationResponse>>> {
    let id = validate_id(id).validate_custom()?;
    let validated = status.validate_custom()?;
    let updated = update_status(db, id, validated).await.validate_custom()?;
    Ok(Json(updated))
}

#[delete("/statuses/<id>")]
pub async fn api_delete_status(id: i64, db: &State<Pool<Sqlite>>) -> Result<Status, AppError> {
    let id = validate_id(id)?;
    delete_status(db, id).await?;
    Ok(Status::NoContent)
}
