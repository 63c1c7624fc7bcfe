use rocket::tokio;

use crate::db::{create_course, delete_course, get_course, get_courses, update_course};
use crate::error::AppError;
use crate::models::{CourseCreate, CourseUpdate};
use crate::test::utils::test_db::{
    create_test_category, create_test_course, create_test_user, setup_test_db,
};

#[tokio::test]
async fn course_with_unknown_category_persists_nothing() {
    let pool = setup_test_db().await;

    let result = create_course(
        &pool,
        CourseCreate {
            title: "Algebra".to_string(),
            description: None,
            category_id: 999,
            creator_id: None,
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    let courses = get_courses(&pool).await.expect("Failed to list courses");
    assert!(courses.is_empty());
}

#[tokio::test]
async fn course_creator_must_be_active() {
    let pool = setup_test_db().await;
    let category = create_test_category(&pool, "Mathematics").await;

    let result = create_course(
        &pool,
        CourseCreate {
            title: "Algebra".to_string(),
            description: None,
            category_id: category.id,
            creator_id: Some(999),
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn duplicate_course_title_is_rejected() {
    let pool = setup_test_db().await;
    let category = create_test_category(&pool, "Mathematics").await;
    create_test_course(&pool, "Algebra", category.id).await;

    let result = create_course(
        &pool,
        CourseCreate {
            title: "Algebra".to_string(),
            description: Some("Second attempt".to_string()),
            category_id: category.id,
            creator_id: None,
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn course_patch_coalesces_with_existing_fields() {
    let pool = setup_test_db().await;
    let category = create_test_category(&pool, "Mathematics").await;
    let teacher = create_test_user(&pool, "irakasle", "teacher").await;
    let course = create_test_course(&pool, "Algebra", category.id).await;

    let updated = update_course(
        &pool,
        course.id,
        CourseUpdate {
            creator_id: Some(teacher.id),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to update course");

    assert_eq!(updated.title, "Algebra");
    assert_eq!(updated.category_id, category.id);
    assert_eq!(updated.creator_id, Some(teacher.id));
}

#[tokio::test]
async fn deleted_course_is_deactivated_but_still_fetchable() {
    let pool = setup_test_db().await;
    let category = create_test_category(&pool, "Mathematics").await;
    let course = create_test_course(&pool, "Algebra", category.id).await;

    delete_course(&pool, course.id).await.expect("Failed to delete course");

    let fetched = get_course(&pool, course.id)
        .await
        .expect("Course should remain fetchable");
    assert!(!fetched.is_active);
}
