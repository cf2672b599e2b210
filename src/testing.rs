//! Fixtures shared by the database-backed tests.

use sqlx::PgPool;
use uuid::Uuid;

use crate::users::{repository, User};

pub async fn create_user(pool: &PgPool, username: &str) -> User {
    // Tests never verify these hashes, so skip argon2.
    repository::create(pool, username, "unused-hash")
        .await
        .expect("failed to create user fixture")
}

/// Rows in `table` whose `column` equals `id`.
pub async fn count(pool: &PgPool, table: &str, column: &str, id: Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM {} WHERE {} = $1",
        table, column
    ))
    .bind(id)
    .fetch_one(pool)
    .await
    .expect("failed to count rows")
}
