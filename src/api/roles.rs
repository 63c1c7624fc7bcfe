use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use sqlx::{Pool, Sqlite};

use crate::db::{create_role, delete_role, get_role, get_roles, update_role};
use crate::error::AppError;
use crate::models::{Role, RoleCreate, RoleUpdate, StatusFilter};
use crate::validation::{AppErrorExt, JsonValidateExt, ValidationResponse, validate_id};

#[get("/roles?<status>")]
pub async fn api_get_roles(
    status: Option<StatusFilter>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<Role>>, AppError> {
    let roles = get_roles(db, status.unwrap_or(StatusFilter::All)).await?;
    Ok(Json(roles))
}

#[post("/roles", data = "<role>")]
pub async fn api_create_role(
    role: Json<RoleCreate>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Role>, Custom<Json<ValidationResponse>>> {
    let validated = role.validate_custom()?;
    let created = create_role(db, validated).await.validate_custom()?;
    Ok(Json(created))
}

#[get("/roles/<id>")]
pub async fn api_get_role(id: i64, db: &State<Pool<Sqlite>>) -> Result<Json<Role>, AppError> {
    let id = validate_id(id)?;
    Ok(Json(get_role(db, id).await?))
}

#[put("/roles/<id>", data = "<role>")]
pub async fn api_update_role(
    id: i64,
    role: Json<RoleUpdate>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Role>, Custom<Json<ValidationResponse>>> {
    let id = validate_id(id).validate_custom()?;
    let validated = role.validate_custom()?;
    let updated = update_role(db, id, validated).await.validate_custom()?;
    Ok(Json(updated))
}

#[delete("/roles/<id>")]
pub async fn api_delete_role(id: i64, db: &State<Pool<Sqlite>>) -> Result<Status, AppError> {
    let id = validate_id(id)?;
    delete_role(db, id).await?;
    Ok(Status::NoContent)
}
