pub mod test_db {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::{Pool, Sqlite};

    use crate::database::init_db;
    use crate::db::{create_category, create_course, create_user};
    use crate::models::{Category, CategoryCreate, Course, CourseCreate, User, UserCreate};

    pub static STANDARD_PASSWORD: &str = "password123";

    /// Fresh in-memory database with the schema applied and default data
    /// seeded. Single connection so every query sees the same database.
    pub async fn setup_test_db() -> Pool<Sqlite> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        init_db(&pool).await.expect("Failed to initialize database");

        pool
    }

    pub async fn role_id(pool: &Pool<Sqlite>, name: &str) -> i64 {
        sqlx::query_scalar("SELECT id FROM roles WHERE name = ?")
            .bind(name)
            .fetch_one(pool)
            .await
            .expect("Role not seeded")
    }

    /// The root user seeded by init_db, which holds the admin role.
    pub async fn root_user_id(pool: &Pool<Sqlite>) -> i64 {
        sqlx::query_scalar("SELECT id FROM users WHERE username = 'root'")
            .fetch_one(pool)
            .await
            .expect("Root user not seeded")
    }

    pub async fn create_test_user(pool: &Pool<Sqlite>, username: &str, role_name: &str) -> User {
        let role_id = role_id(pool, role_name).await;

        create_user(
            pool,
            UserCreate {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                contact_number: None,
                password: STANDARD_PASSWORD.to_string(),
                role_id,
            },
        )
        .await
        .expect("Failed to create test user")
    }

    pub async fn create_test_category(pool: &Pool<Sqlite>, name: &str) -> Category {
        create_category(
            pool,
            CategoryCreate {
                name: name.to_string(),
                description: None,
            },
        )
        .await
        .expect("Failed to create test category")
    }

    pub async fn create_test_course(pool: &Pool<Sqlite>, title: &str, category_id: i64) -> Course {
        create_course(
            pool,
            CourseCreate {
                title: title.to_string(),
                description: None,
                category_id,
                creator_id: None,
            },
        )
        .await
        .expect("Failed to create test course")
    }
}
