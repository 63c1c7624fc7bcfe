use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use sqlx::{Pool, Sqlite};

use crate::db::{
    create_enrollment, delete_enrollment, get_enrollment, get_enrollments, get_student_progress,
    update_enrollment,
};
use crate::error::AppError;
use crate::models::{Enrollment, EnrollmentCreate, EnrollmentUpdate, StudentProgress};
use crate::validation::{AppErrorExt, JsonValidateExt, ValidationResponse, validate_id};

#[get("/enrollments")]
pub async fn api_get_enrollments(
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<Enrollment>>, AppError> {
    Ok(Json(get_enrollments(db).await?))
}

#[post("/enrollments", data = "<enrollment>")]
pub async fn api_create_enrollment(
    enrollment: Json<EnrollmentCreate>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Enrollment>, Custom<Json<ValidationResponse>>> {
    let validated = enrollment.validate_custom()?;
    let created = create_enrollment(db, validated).await.validate_custom()?;
    Ok(Json(created))
}

#[get("/enrollments/<id>")]
pub async fn api_get_enrollment(
    id: i64,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Enrollment>, AppError> {
    let id = validate_id(id)?;
    Ok(Json(get_enrollment(db, id).await?))
}

#[put("/enrollments/<id>", data = "<enrollment>")]
pub async fn api_update_enrollment(
    id: i64,
    enrollment: Json<EnrollmentUpdate>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Enrollment>, Custom<Json<ValidationResponse>>> {
    let id = validate_id(id).validate_custom()?;
    let validated = enrollment.validate_custom()?;
    let updated = update_enrollment(db, id, validated).await.validate_custom()?;
    Ok(Json(updated))
}

#[delete("/enrollments/<id>")]
pub async fn api_delete_enrollment(id: i64, db: &State<Pool<Sqlite>>) -> Result<Status, AppError> {
    let id = validate_id(id)?;
    delete_enrollment(db, id).await?;
    Ok(Status::NoContent)
}

#[get("/enrollments/student/<student_id>/progress")]
pub async fn api_get_student_progress(
    student_id: i64,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<StudentProgress>, AppError> {
    let student_id = validate_id(student_id)?;
    Ok(Json(get_student_progress(db, student_id).await?))
}
