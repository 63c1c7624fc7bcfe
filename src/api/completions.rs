use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use sqlx::{Pool, Sqlite};

use crate::db::{
    create_completion, delete_completion, get_completion, get_completions, update_completion,
};
use crate::error::AppError;
use crate::models::{Completion, CompletionCreate, CompletionUpdate};
use crate::validation::{AppErrorExt, JsonValidateExt, ValidationResponse, validate_id};

#[get("/completions")]
pub async fn api_get_completions(
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<Completion>>, AppError> {
    Ok(Json(get_completions(db).await?))
}

#[post("/completions", data = "<completion>")]
pub async fn api_create_completion(
    completion: Json<CompletionCreate>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Completion>, Custom<Json<ValidationResponse>>> {
    let validated = completion.validate_custom()?;
    let created = create_completion(db, validated).await.validate_custom()?;
    Ok(Json(created))
}

#[get("/completions/<id>")]
pub async fn api_get_completion(
    id: i64,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Completion>, AppError> {
    let id = validate_id(id)?;
    Ok(Json(get_completion(db, id).await?))
}

#[put("/completions/<id>", data = "<completion>")]
pub async fn api_update_completion(
    id: i64,
    completion: Json<CompletionUpdate>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Completion>, Custom<Json<ValidationResponse>>> {
    let id = validate_id(id).validate_custom()?;
    let validated = completion.validate_custom()?;
    let updated = update_completion(db, id, validated).await.validate_custom()?;
    Ok(Json(updated))
}

#[delete("/completions/<id>")]
pub async fn api_delete_completion(id: i64, db: &State<Pool<Sqlite>>) -> Result<Status, AppError> {
    let id = validate_id(id)?;
    delete_completion(db, id).await?;
    Ok(Status::NoContent)
}
