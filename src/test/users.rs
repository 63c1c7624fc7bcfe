use rocket::tokio;
use sqlx::{Pool, Sqlite};

use crate::db::{create_user, delete_user, get_user, get_users, update_user};
use crate::error::AppError;
use crate::models::{StatusFilter, UserCreate, UserUpdate};
use crate::test::utils::test_db::{
    STANDARD_PASSWORD, create_test_user, role_id, setup_test_db,
};

#[tokio::test]
async fn created_user_round_trips() {
    let pool = setup_test_db().await;
    let role_id = role_id(&pool, "student").await;

    let created = create_user(
        &pool,
        UserCreate {
            username: "amaia".to_string(),
            email: "amaia@example.com".to_string(),
            first_name: "Amaia".to_string(),
            last_name: "Etxeberria".to_string(),
            contact_number: Some("0400123456".to_string()),
            password: STANDARD_PASSWORD.to_string(),
            role_id,
        },
    )
    .await
    .expect("Failed to create user");

    let fetched = get_user(&pool, created.id).await.expect("Failed to fetch user");

    assert_eq!(fetched.username, "amaia");
    assert_eq!(fetched.email, "amaia@example.com");
    assert_eq!(fetched.contact_number.as_deref(), Some("0400123456"));
    assert_eq!(fetched.role_id, role_id);
    assert!(fetched.is_active);
}

#[tokio::test]
async fn user_with_unknown_role_is_rejected() {
    let pool = setup_test_db().await;

    let result = create_user(
        &pool,
        UserCreate {
            username: "amaia".to_string(),
            email: "amaia@example.com".to_string(),
            first_name: "Amaia".to_string(),
            last_name: "Etxeberria".to_string(),
            contact_number: None,
            password: STANDARD_PASSWORD.to_string(),
            role_id: 999,
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let pool = setup_test_db().await;
    create_test_user(&pool, "amaia", "student").await;
    let role_id = role_id(&pool, "teacher").await;

    let result = create_user(
        &pool,
        UserCreate {
            username: "amaia".to_string(),
            email: "other@example.com".to_string(),
            first_name: "Other".to_string(),
            last_name: "Person".to_string(),
            contact_number: None,
            password: STANDARD_PASSWORD.to_string(),
            role_id,
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn empty_user_patch_changes_nothing() {
    let pool = setup_test_db().await;
    let user = create_test_user(&pool, "amaia", "student").await;

    let updated = update_user(&pool, user.id, UserUpdate::default())
        .await
        .expect("Failed to update user");

    assert_eq!(updated.username, user.username);
    assert_eq!(updated.email, user.email);
    assert_eq!(updated.first_name, user.first_name);
    assert_eq!(updated.last_name, user.last_name);
    assert_eq!(updated.contact_number, user.contact_number);
    assert_eq!(updated.role_id, user.role_id);
    assert_eq!(updated.is_active, user.is_active);
}

#[tokio::test]
async fn deactivated_user_is_hidden_from_lookups() {
    let pool = setup_test_db().await;
    let user = create_test_user(&pool, "amaia", "student").await;

    delete_user(&pool, user.id).await.expect("Failed to delete user");

    let result = get_user(&pool, user.id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    // The seeded root user stays in the active listing.
    let active = get_users(&pool, StatusFilter::Active)
        .await
        .expect("Failed to list users");
    assert!(active.iter().any(|u| u.username == "root"));
    assert!(!active.iter().any(|u| u.id == user.id));

    let inactive = get_users(&pool, StatusFilter::Inactive)
        .await
        .expect("Failed to list users");
    assert!(inactive.iter().any(|u| u.id == user.id));

    let all = get_users(&pool, StatusFilter::All)
        .await
        .expect("Failed to list users");
    assert!(all.iter().any(|u| u.id == user.id));
    assert!(all.iter().any(|u| u.username == "root"));
}

async fn password_hash(pool: &Pool<Sqlite>, id: i64) -> String {
    sqlx::query_scalar("SELECT password FROM users WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("Failed to read password hash")
}

#[tokio::test]
async fn rejected_patch_does_not_change_the_password() {
    let pool = setup_test_db().await;
    create_test_user(&pool, "amaia", "student").await;
    let user = create_test_user(&pool, "izar", "student").await;
    let hash_before = password_hash(&pool, user.id).await;

    // Duplicate username makes the field update fail after the password
    // statement has already run; the whole patch must roll back.
    let result = update_user(
        &pool,
        user.id,
        UserUpdate {
            username: Some("amaia".to_string()),
            password: Some("newsecret".to_string()),
            ..Default::default()
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(password_hash(&pool, user.id).await, hash_before);
}

#[tokio::test]
async fn reactivation_through_patch_restores_lookups() {
    let pool = setup_test_db().await;
    let user = create_test_user(&pool, "amaia", "student").await;
    delete_user(&pool, user.id).await.expect("Failed to delete user");

    update_user(
        &pool,
        user.id,
        UserUpdate {
            is_active: Some(true),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to reactivate user");

    let fetched = get_user(&pool, user.id).await.expect("User should be visible again");
    assert!(fetched.is_active);
}
