use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use sqlx::{Pool, Sqlite};

use crate::db::{create_category, delete_category, get_categories, get_category, update_category};
use crate::error::AppError;
use crate::models::{Category, CategoryCreate, CategoryUpdate};
use crate::validation::{AppErrorExt, JsonValidateExt, ValidationResponse, validate_id};

#[get("/categories")]
pub async fn api_get_categories(
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(get_categories(db).await?))
}

#[post("/categories", data = "<category>")]
pub async fn api_create_category(
    category: Json<CategoryCreate>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Category>, Custom<Json<ValidationResponse>>> {
    let validated = category.validate_custom()?;
    let created = create_category(db, validated).await.validate_custom()?;
    Ok(Json(created))
}

#[get("/categories/<id>")]
pub async fn api_get_category(
    id: i64,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Category>, AppError> {
    let id = validate_id(id)?;
    Ok(Json(get_category(db, id).await?))
}

#[put("/categories/<id>", data = "<category>")]
pub async fn api_update_category(
    id: i64,
    category: Json<CategoryUpdate>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Category>, Custom<Json<ValidationResponse>>> {
    let id = validate_id(id).validate_custom()?;
    let validated = category.validate_custom()?;
    let updated = update_category(db, id, validated).await.validate_custom()?;
    Ok(Json(updated))
}

#[delete("/categories/<id>")]
pub async fn api_delete_category(id: i64, db: &State<Pool<Sqlite>>) -> Result<Status, AppError> {
    let id = validate_id(id)?;
    delete_category(db, id).await?;
    Ok(Status::NoContent)
}
