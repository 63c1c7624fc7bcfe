use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use sqlx::{Pool, Sqlite};

use crate::db::{create_course, delete_course, get_course, get_courses, update_course};
use crate::error::AppError;
use crate::models::{Course, CourseCreate, CourseUpdate};
use crate::validation::{AppErrorExt, JsonValidateExt, ValidationResponse, validate_id};

#[get("/courses")]
pub async fn api_get_courses(db: &State<Pool<Sqlite>>) -> Result<Json<Vec<Course>>, AppError> {
    Ok(Json(get_courses(db).await?))
}

#[post("/courses", data = "<course>")]
pub async fn api_create_course(
    course: Json<CourseCreate>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Course>, Custom<Json<ValidationResponse>>> {
    let validated = course.validate_custom()?;
    let created = create_course(db, validated).await.validate_custom()?;
    Ok(Json(created))
}

#[get("/courses/<id>")]
pub async fn api_get_course(id: i64, db: &State<Pool<Sqlite>>) -> Result<Json<Course>, AppError> {
    let id = validate_id(id)?;
    Ok(Json(get_course(db, id).await?))
}

#[put("/courses/<id>", data = "<course>")]
pub async fn api_update_course(
    id: i64,
    course: Json<CourseUpdate>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Course>, Custom<Json<ValidationResponse>>> {
    let id = validate_id(id).validate_custom()?;
    let validated = course.validate_custom()?;
    let updated = update_course(db, id, validated).await.validate_custom()?;
    Ok(Json(updated))
}

#[delete("/courses/<id>")]
pub async fn api_delete_course(id: i64, db: &State<Pool<Sqlite>>) -> Result<Status, AppError> {
    let id = validate_id(id)?;
    delete_course(db, id).await?;
    Ok(Status::NoContent)
}
