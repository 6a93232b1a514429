#![allow(dead_code, unused_macros)]

use dotenv::dotenv;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

/// Connects to `DATABASE_URL` and applies the migrations.
///
/// Returns `None` when no database is configured so the caller can skip.
/// Under `CI` a missing database is a failure instead.
pub async fn test_pool() -> Option<PgPool> {
    dotenv().ok();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        assert!(
            std::env::var_os("CI").is_none(),
            "CI is set but DATABASE_URL is not: database tests would be skipped"
        );
        eprintln!("DATABASE_URL is not set, skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    taskify::db::migrate(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

/// List names are unique, so every test run gets its own.
pub fn unique_name(prefix: &str) -> String {
    format!("{} {}", prefix, Uuid::new_v4())
}

pub async fn count_lists_named(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM lists WHERE name = $1")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("count lists")
}

pub async fn count_tasks_in_list(pool: &PgPool, list_id: i32) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks WHERE list_id = $1")
        .bind(list_id)
        .fetch_one(pool)
        .await
        .expect("count tasks")
}

/// Builds the application the way `main` does, minus the logger.
macro_rules! test_app {
    ($pool:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($pool.clone()))
                .wrap(actix_web::middleware::NormalizePath::trim())
                .wrap(taskify::cors())
                .configure(taskify::routes::config),
        )
        .await
    };
}
