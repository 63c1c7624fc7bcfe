use chrono::Utc;
use rocket::tokio;

use crate::db::{
    create_completion, create_enrollment, create_task, delete_user, get_student_progress,
};
use crate::error::AppError;
use crate::models::{CompletionCreate, EnrollmentCreate, TaskCreate};
use crate::test::utils::test_db::{
    create_test_category, create_test_course, create_test_user, root_user_id, setup_test_db,
};

fn enrollment_payload(student_id: i64, course_id: i64, assigned_by: i64) -> EnrollmentCreate {
    EnrollmentCreate {
        student_id,
        course_id,
        assigned_by,
        deadline: None,
        feedback: None,
        completed_at: None,
    }
}

#[tokio::test]
async fn enrollment_requires_an_active_student() {
    let pool = setup_test_db().await;
    let admin = root_user_id(&pool).await;
    let category = create_test_category(&pool, "Mathematics").await;
    let course = create_test_course(&pool, "Algebra", category.id).await;
    let student = create_test_user(&pool, "amaia", "student").await;

    delete_user(&pool, student.id).await.expect("Failed to delete student");

    let result = create_enrollment(&pool, enrollment_payload(student.id, course.id, admin)).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn repeated_enrollment_is_rejected() {
    let pool = setup_test_db().await;
    let admin = root_user_id(&pool).await;
    let category = create_test_category(&pool, "Mathematics").await;
    let course = create_test_course(&pool, "Algebra", category.id).await;
    let student = create_test_user(&pool, "amaia", "student").await;

    create_enrollment(&pool, enrollment_payload(student.id, course.id, admin))
        .await
        .expect("First enrollment should succeed");

    let result = create_enrollment(&pool, enrollment_payload(student.id, course.id, admin)).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn progress_counts_timestamped_completions_only() {
    let pool = setup_test_db().await;
    let admin = root_user_id(&pool).await;
    let category = create_test_category(&pool, "Mathematics").await;
    let course = create_test_course(&pool, "Algebra", category.id).await;
    let student = create_test_user(&pool, "amaia", "student").await;

    create_enrollment(&pool, enrollment_payload(student.id, course.id, admin))
        .await
        .expect("Failed to enroll student");

    let mut tasks = Vec::new();
    for n in 1..=5 {
        let task = create_task(
            &pool,
            TaskCreate {
                title: format!("Homework {}", n),
                description: None,
                course_id: course.id,
                category_id: Some(category.id),
                parent_id: None,
                created_by: admin,
            },
        )
        .await
        .expect("Failed to create task");
        tasks.push(task);
    }

    let now = Utc::now().naive_utc();
    for task in &tasks[..2] {
        create_completion(
            &pool,
            CompletionCreate {
                task_id: task.id,
                student_id: student.id,
                completed_at: Some(now),
            },
        )
        .await
        .expect("Failed to record completion");
    }

    // Started but not finished, so it must not count.
    create_completion(
        &pool,
        CompletionCreate {
            task_id: tasks[2].id,
            student_id: student.id,
            completed_at: None,
        },
    )
    .await
    .expect("Failed to record open completion");

    let progress = get_student_progress(&pool, student.id)
        .await
        .expect("Failed to compute progress");

    assert_eq!(progress.enrollment.student_id, student.id);
    assert_eq!(progress.enrollment.course_id, course.id);
    assert_eq!(progress.total_tasks, 5);
    assert_eq!(progress.completed_tasks, 2);
}

#[tokio::test]
async fn progress_without_an_enrollment_is_not_found() {
    let pool = setup_test_db().await;
    let student = create_test_user(&pool, "amaia", "student").await;

    let result = get_student_progress(&pool, student.id).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn repeated_completion_for_a_task_is_rejected() {
    let pool = setup_test_db().await;
    let admin = root_user_id(&pool).await;
    let category = create_test_category(&pool, "Mathematics").await;
    let course = create_test_course(&pool, "Algebra", category.id).await;
    let student = create_test_user(&pool, "amaia", "student").await;

    let task = create_task(
        &pool,
        TaskCreate {
            title: "Homework 1".to_string(),
            description: None,
            course_id: course.id,
            category_id: Some(category.id),
            parent_id: None,
            created_by: admin,
        },
    )
    .await
    .expect("Failed to create task");

    create_completion(
        &pool,
        CompletionCreate {
            task_id: task.id,
            student_id: student.id,
            completed_at: None,
        },
    )
    .await
    .expect("First completion should succeed");

    let result = create_completion(
        &pool,
        CompletionCreate {
            task_id: task.id,
            student_id: student.id,
            completed_at: None,
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}
