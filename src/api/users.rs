use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use sqlx::{Pool, Sqlite};

use crate::db::{create_user, delete_user, get_user, get_users, update_user};
use crate::error::AppError;
use crate::models::{StatusFilter, User, UserCreate, UserUpdate};
use crate::validation::{AppErrorExt, JsonValidateExt, ValidationResponse, validate_id};

#[get("/users?<status>")]
pub async fn api_get_users(
    status: Option<StatusFilter>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = get_users(db, status.unwrap_or(StatusFilter::All)).await?;
    Ok(Json(users))
}

#[post("/users", data = "<user>")]
pub async fn api_create_user(
    user: Json<UserCreate>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<User>, Custom<Json<ValidationResponse>>> {
    let validated = user.validate_custom()?;
    let created = create_user(db, validated).await.validate_custom()?;
    Ok(Json(created))
}

#[get("/users/<id>")]
pub async fn api_get_user(id: i64, db: &State<Pool<Sqlite>>) -> Result<Json<User>, AppError> {
    let id = validate_id(id)?;
    Ok(Json(get_user(db, id).await?))
}

#[put("/users/<id>", data = "<user>")]
pub async fn api_update_user(
    id: i64,
    user: Json<UserUpdate>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<User>, Custom<Json<ValidationResponse>>> {
    let id = validate_id(id).validate_custom()?;
    let validated = user.validate_custom()?;
    let updated = update_user(db, id, validated).await.validate_custom()?;
    Ok(Json(updated))
}

#[delete("/users/<id>")]
pub async fn api_delete_user(id: i64, db: &State<Pool<Sqlite>>) -> Result<Status, AppError> {
    let id = validate_id(id)?;
    delete_user(db, id).await?;
    Ok(Status::NoContent)
}
