use rocket::tokio;

use crate::db::{create_task, get_categories, update_task};
use crate::error::AppError;
use crate::models::{TaskCreate, TaskUpdate};
use crate::test::utils::test_db::{
    create_test_category, create_test_course, create_test_user, root_user_id, setup_test_db,
};

fn task_payload(title: &str, course_id: i64, created_by: i64) -> TaskCreate {
    TaskCreate {
        title: title.to_string(),
        description: None,
        course_id,
        category_id: None,
        parent_id: None,
        created_by,
    }
}

#[tokio::test]
async fn task_creation_requires_the_admin_role() {
    let pool = setup_test_db().await;
    let category = create_test_category(&pool, "Mathematics").await;
    let course = create_test_course(&pool, "Algebra", category.id).await;
    let student = create_test_user(&pool, "amaia", "student").await;

    let result = create_task(&pool, task_payload("Homework 1", course.id, student.id)).await;

    assert!(matches!(result, Err(AppError::Authorization(_))));
}

#[tokio::test]
async fn uncategorized_category_is_created_once_and_reused() {
    let pool = setup_test_db().await;
    let admin = root_user_id(&pool).await;
    let category = create_test_category(&pool, "Mathematics").await;
    let course = create_test_course(&pool, "Algebra", category.id).await;

    let first = create_task(&pool, task_payload("Homework 1", course.id, admin))
        .await
        .expect("Failed to create first task");
    let second = create_task(&pool, task_payload("Homework 2", course.id, admin))
        .await
        .expect("Failed to create second task");

    assert_eq!(first.category_id, second.category_id);
    assert_ne!(first.category_id, category.id);

    let fallbacks: Vec<_> = get_categories(&pool)
        .await
        .expect("Failed to list categories")
        .into_iter()
        .filter(|c| c.name == "Uncategorized")
        .collect();
    assert_eq!(fallbacks.len(), 1);
}

#[tokio::test]
async fn explicit_category_is_kept() {
    let pool = setup_test_db().await;
    let admin = root_user_id(&pool).await;
    let category = create_test_category(&pool, "Mathematics").await;
    let course = create_test_course(&pool, "Algebra", category.id).await;

    let task = create_task(
        &pool,
        TaskCreate {
            category_id: Some(category.id),
            ..task_payload("Homework 1", course.id, admin)
        },
    )
    .await
    .expect("Failed to create task");

    assert_eq!(task.category_id, category.id);
}

#[tokio::test]
async fn task_cannot_become_its_own_ancestor() {
    let pool = setup_test_db().await;
    let admin = root_user_id(&pool).await;
    let category = create_test_category(&pool, "Mathematics").await;
    let course = create_test_course(&pool, "Algebra", category.id).await;

    let root = create_task(&pool, task_payload("Unit 1", course.id, admin))
        .await
        .expect("Failed to create root task");
    let child = create_task(
        &pool,
        TaskCreate {
            parent_id: Some(root.id),
            ..task_payload("Exercise 1.1", course.id, admin)
        },
    )
    .await
    .expect("Failed to create child task");

    let direct = update_task(
        &pool,
        root.id,
        TaskUpdate {
            parent_id: Some(root.id),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(direct, Err(AppError::Validation(_))));

    let through_child = update_task(
        &pool,
        root.id,
        TaskUpdate {
            parent_id: Some(child.id),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(through_child, Err(AppError::Validation(_))));
}
