use chrono::NaiveDateTime;
use rocket::FromFormField;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Filter applied to user/role listings. `All` leaves soft-deleted rows in
/// the result set, matching the storage default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromFormField)]
pub enum StatusFilter {
    All,
    Active,
    Inactive,
}

// ---------------------------------------------------------------------------
// Roles

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RoleCreate {
    #[validate(length(min = 3, max = 50, message = "Name must be 3-50 characters"))]
    pub name: String,
    #[validate(length(max = 100, message = "Description must be at most 100 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, Default)]
pub struct RoleUpdate {
    #[validate(length(min = 3, max = 50, message = "Name must be 3-50 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 100, message = "Description must be at most 100 characters"))]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Users

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub contact_number: Option<String>,
    pub role_id: i64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    #[validate(length(min = 5, max = 50, message = "Email must be 5-50 characters"))]
    pub email: String,
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,
    #[validate(length(min = 9, max = 15, message = "Contact number must be 9-15 characters"))]
    pub contact_number: Option<String>,
    #[validate(length(min = 6, max = 50, message = "Password must be 6-50 characters"))]
    pub password: String,
    pub role_id: i64,
}

#[derive(Debug, Deserialize, Validate, Default)]
pub struct UserUpdate {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: Option<String>,
    #[validate(length(min = 5, max = 50, message = "Email must be 5-50 characters"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: Option<String>,
    #[validate(length(min = 9, max = 15, message = "Contact number must be 9-15 characters"))]
    pub contact_number: Option<String>,
    #[validate(length(min = 6, max = 50, message = "Password must be 6-50 characters"))]
    pub password: Option<String>,
    pub role_id: Option<i64>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Categories

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryCreate {
    #[validate(length(min = 3, max = 50, message = "Name must be 3-50 characters"))]
    pub name: String,
    #[validate(length(max = 100, message = "Description must be at most 100 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryUpdate {
    #[validate(length(min = 3, max = 50, message = "Name must be 3-50 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 100, message = "Description must be at most 100 characters"))]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Courses

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub creator_id: Option<i64>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CourseCreate {
    #[validate(length(min = 3, max = 50, message = "Title must be 3-50 characters"))]
    pub title: String,
    #[validate(length(max = 100, message = "Description must be at most 100 characters"))]
    pub description: Option<String>,
    pub category_id: i64,
    pub creator_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, Default)]
pub struct CourseUpdate {
    #[validate(length(min = 3, max = 50, message = "Title must be 3-50 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 100, message = "Description must be at most 100 characters"))]
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub creator_id: Option<i64>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Tasks

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub course_id: i64,
    pub category_id: i64,
    pub parent_id: Option<i64>,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TaskCreate {
    #[validate(length(min = 1, max = 50, message = "Title must be 1-50 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 100, message = "Description must be 1-100 characters"))]
    pub description: Option<String>,
    pub course_id: i64,
    /// Defaults to the lazily created "Uncategorized" category when absent.
    pub category_id: Option<i64>,
    pub parent_id: Option<i64>,
    /// Acting user; must hold the admin role.
    pub created_by: i64,
}

#[derive(Debug, Deserialize, Validate, Default)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 50, message = "Title must be 1-50 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Description must be 1-100 characters"))]
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Enrollments

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub assigned_by: i64,
    pub enrolled_at: NaiveDateTime,
    pub deadline: Option<NaiveDateTime>,
    pub feedback: Option<String>,
    pub completed_at: Option<NaiveDateTime>,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EnrollmentCreate {
    pub student_id: i64,
    pub course_id: i64,
    pub assigned_by: i64,
    pub deadline: Option<NaiveDateTime>,
    #[validate(length(max = 255, message = "Feedback must be at most 255 characters"))]
    pub feedback: Option<String>,
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize, Validate, Default)]
pub struct EnrollmentUpdate {
    pub student_id: Option<i64>,
    pub course_id: Option<i64>,
    pub assigned_by: Option<i64>,
    pub deadline: Option<NaiveDateTime>,
    #[validate(length(max = 255, message = "Feedback must be at most 255 characters"))]
    pub feedback: Option<String>,
    pub completed_at: Option<NaiveDateTime>,
    pub is_active: Option<bool>,
}

/// Enrollment augmented with the task-completion summary for the student.
#[derive(Debug, Serialize, Deserialize)]
pub struct StudentProgress {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub total_tasks: i64,
    pub completed_tasks: i64,
}

// ---------------------------------------------------------------------------
// Completions

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Completion {
    pub id: i64,
    pub task_id: i64,
    pub student_id: i64,
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompletionCreate {
    pub task_id: i64,
    pub student_id: i64,
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize, Validate, Default)]
pub struct CompletionUpdate {
    pub task_id: Option<i64>,
    pub student_id: Option<i64>,
    pub completed_at: Option<NaiveDateTime>,
}

// ---------------------------------------------------------------------------
// Statuses

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct StatusRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StatusCreate {
    #[validate(length(min = 3, max = 50, message = "Name must be 3-50 characters"))]
    pub name: String,
    #[validate(length(max = 100, message = "Description must be at most 100 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StatusUpdate {
    #[validate(length(min = 3, max = 50, message = "Name must be 3-50 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 100, message = "Description must be at most 100 characters"))]
    pub description: Option<String>,
}
