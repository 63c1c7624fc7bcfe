use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::db::courses::ensure_active_course;
use crate::db::users::ensure_active_user;
use crate::error::AppError;
use crate::models::{Enrollment, EnrollmentCreate, EnrollmentUpdate, StudentProgress};
use crate::validation::validate_id;

const COLUMNS: &str = "id, student_id, course_id, assigned_by, enrolled_at, deadline, feedback, completed_at, is_active";

#[instrument(skip(pool))]
pub async fn get_enrollments(pool: &Pool<Sqlite>) -> Result<Vec<Enrollment>, AppError> {
    info!("Listing enrollments");
    let query = format!("SELECT {} FROM enrollments", COLUMNS);

    Ok(sqlx::query_as::<_, Enrollment>(&query)
        .fetch_all(pool)
        .await?)
}

async fn fetch_enrollment(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Enrollment>, AppError> {
    let query = format!("SELECT {} FROM enrollments WHERE id = ?", COLUMNS);
    Ok(sqlx::query_as::<_, Enrollment>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

/// Deactivated enrollments are treated as absent, matching user lookups.
#[instrument(skip(pool))]
pub async fn get_enrollment(pool: &Pool<Sqlite>, id: i64) -> Result<Enrollment, AppError> {
    info!("Fetching enrollment by ID");
    match fetch_enrollment(pool, id).await? {
        Some(enrollment) if enrollment.is_active => Ok(enrollment),
        _ => Err(AppError::NotFound(format!(
            "Enrollment with id {} not found",
            id
        ))),
    }
}

#[instrument(skip(pool, data))]
pub async fn create_enrollment(
    pool: &Pool<Sqlite>,
    data: EnrollmentCreate,
) -> Result<Enrollment, AppError> {
    info!("Creating enrollment");
    ensure_active_user(pool, data.student_id, "Student").await?;
    ensure_active_course(pool, data.course_id).await?;
    ensure_active_user(pool, data.assigned_by, "Assigner").await?;

    let res = sqlx::query(
        "INSERT INTO enrollments (student_id, course_id, assigned_by, deadline, feedback, completed_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(data.student_id)
    .bind(data.course_id)
    .bind(data.assigned_by)
    .bind(data.deadline)
    .bind(&data.feedback)
    .bind(data.completed_at)
    .execute(pool)
    .await
    .map_err(|e| AppError::from_write(e, "Enrollment"))?;

    get_enrollment(pool, res.last_insert_rowid()).await
}

#[instrument(skip(pool, data))]
pub async fn update_enrollment(
    pool: &Pool<Sqlite>,
    id: i64,
    data: EnrollmentUpdate,
) -> Result<Enrollment, AppError> {
    info!("Updating enrollment");
    let existing = fetch_enrollment(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Enrollment with id {} not found", id)))?;

    if let Some(student_id) = data.student_id {
        ensure_active_user(pool, student_id, "Student").await?;
    }
    if let Some(course_id) = data.course_id {
        ensure_active_course(pool, course_id).await?;
    }
    if let Some(assigned_by) = data.assigned_by {
        ensure_active_user(pool, assigned_by, "Assigner").await?;
    }

    let student_id = data.student_id.unwrap_or(existing.student_id);
    let course_id = data.course_id.unwrap_or(existing.course_id);
    let assigned_by = data.assigned_by.unwrap_or(existing.assigned_by);
    let deadline = data.deadline.or(existing.deadline);
    let feedback = data.feedback.or(existing.feedback);
    let completed_at = data.completed_at.or(existing.completed_at);
    let is_active = data.is_active.unwrap_or(existing.is_active);

    sqlx::query(
        "UPDATE enrollments
         SET student_id = ?, course_id = ?, assigned_by = ?, deadline = ?,
             feedback = ?, completed_at = ?, is_active = ?
         WHERE id = ?",
    )
    .bind(student_id)
    .bind(course_id)
    .bind(assigned_by)
    .bind(deadline)
    .bind(&feedback)
    .bind(completed_at)
    .bind(is_active)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| AppError::from_write(e, "Enrollment"))?;

    let updated = fetch_enrollment(pool, id).await?;
    updated.ok_or_else(|| AppError::NotFound(format!("Enrollment with id {} not found", id)))
}

/// Enrollments are audit history, so deletion only deactivates the row.
#[instrument(skip(pool))]
pub async fn delete_enrollment(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deactivating enrollment");
    fetch_enrollment(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Enrollment with id {} not found", id)))?;

    sqlx::query("UPDATE enrollments SET is_active = FALSE WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Task-completion summary for a student: total tasks in the enrolled course
/// against the student's completions carrying a completion timestamp. Both
/// counts are recomputed from scratch on every call.
#[instrument(skip(pool))]
pub async fn get_student_progress(
    pool: &Pool<Sqlite>,
    student_id: i64,
) -> Result<StudentProgress, AppError> {
    info!("Computing task-completion summary");
    let query = format!(
        "SELECT {} FROM enrollments WHERE student_id = ? LIMIT 1",
        COLUMNS
    );
    let enrollment = sqlx::query_as::<_, Enrollment>(&query)
        .bind(validate_id(student_id)?)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Enrollment for student with id {} not found",
                student_id
            ))
        })?;

    let total_tasks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE course_id = ?")
        .bind(enrollment.course_id)
        .fetch_one(pool)
        .await?;

    let completed_tasks: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM completions c
         JOIN tasks t ON t.id = c.task_id
         WHERE c.student_id = ? AND t.course_id = ? AND c.completed_at IS NOT NULL",
    )
    .bind(enrollment.student_id)
    .bind(enrollment.course_id)
    .fetch_one(pool)
    .await?;

    Ok(StudentProgress {
        enrollment,
        total_tasks,
        completed_tasks,
    })
}
