use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppError,
    users::{User, UserProfileResponse},
};

pub async fn create(pool: &PgPool, username: &str, password_hash: &str) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING *",
    )
    .bind(username)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let found = sqlx::query("SELECT 1 FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .is_some();

    Ok(found)
}

pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<User>, AppError> {
    let users = sqlx::query_as::<_, User>(
        "SELECT * FROM users ORDER BY username ASC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Profile of `id` with counts; `is_following` is relative to `viewer`.
pub async fn profile(
    pool: &PgPool,
    id: Uuid,
    viewer: Option<Uuid>,
) -> Result<Option<UserProfileResponse>, AppError> {
    let profile = sqlx::query_as::<_, UserProfileResponse>(
        r#"
        SELECT
            u.id, u.username, u.created_at,
            (SELECT COUNT(*) FROM posts p WHERE p.author_id = u.id) AS post_count,
            (SELECT COUNT(*) FROM follows f WHERE f.following_id = u.id) AS followers_count,
            (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.id) AS following_count,
            EXISTS (
                SELECT 1 FROM follows f WHERE f.follower_id = $2 AND f.following_id = u.id
            ) AS is_following
        FROM users u
        WHERE u.id = $1
        "#,
    )
    .bind(id)
    .bind(viewer)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

/// Applies whichever fields are present; absent fields keep their stored value.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    username: Option<&str>,
    password_hash: Option<&str>,
) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET username = COALESCE($2, username),
            password_hash = COALESCE($3, password_hash)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(username)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(user)
}

/// Removes the account. Posts, likes (given and received) and follow edges on
/// either side go with it through the foreign-key cascades.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{follows, likes, posts, testing};

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    async fn duplicate_username_is_a_conflict(pool: PgPool) {
        testing::create_user(&pool, "ada").await;

        let err = create(&pool, "ada", "hash").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "got {:?}", err);
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    async fn update_keeps_absent_fields(pool: PgPool) {
        let user = testing::create_user(&pool, "ada").await;

        let updated = update(&pool, user.id, Some("lovelace"), None).await.unwrap();
        assert_eq!(updated.username, "lovelace");
        assert_eq!(updated.password_hash, user.password_hash);

        let missing = update(&pool, Uuid::new_v4(), Some("ghost"), None).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    async fn deleting_a_user_cascades_to_everything_they_touch(pool: PgPool) {
        let alice = testing::create_user(&pool, "alice").await;
        let bob = testing::create_user(&pool, "bob").await;
        let carol = testing::create_user(&pool, "carol").await;

        let alice_post = posts::repository::create(&pool, alice.id, "", "alice writes")
            .await
            .unwrap();
        let bob_post = posts::repository::create(&pool, bob.id, "", "bob writes")
            .await
            .unwrap();

        // alice likes bob's post, carol likes alice's post
        likes::repository::toggle_like(&pool, alice.id, bob_post.id)
            .await
            .unwrap();
        likes::repository::toggle_like(&pool, carol.id, alice_post.id)
            .await
            .unwrap();

        // alice follows bob, carol follows alice
        follows::repository::toggle_follow(&pool, alice.id, bob.id)
            .await
            .unwrap();
        follows::repository::toggle_follow(&pool, carol.id, alice.id)
            .await
            .unwrap();

        delete(&pool, alice.id).await.unwrap();

        assert_eq!(testing::count(&pool, "posts", "author_id", alice.id).await, 0);
        assert_eq!(testing::count(&pool, "likes", "user_id", alice.id).await, 0);
        assert_eq!(testing::count(&pool, "likes", "post_id", alice_post.id).await, 0);
        assert_eq!(testing::count(&pool, "follows", "follower_id", alice.id).await, 0);
        assert_eq!(testing::count(&pool, "follows", "following_id", alice.id).await, 0);

        // bob's own data survives
        assert_eq!(testing::count(&pool, "posts", "author_id", bob.id).await, 1);
        assert!(exists(&pool, bob.id).await.unwrap());
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    async fn profile_counts_and_viewer_relation(pool: PgPool) {
        let alice = testing::create_user(&pool, "alice").await;
        let bob = testing::create_user(&pool, "bob").await;

        posts::repository::create(&pool, bob.id, "", "hello").await.unwrap();
        follows::repository::toggle_follow(&pool, alice.id, bob.id)
            .await
            .unwrap();

        let seen_by_alice = profile(&pool, bob.id, Some(alice.id)).await.unwrap().unwrap();
        assert_eq!(seen_by_alice.post_count, 1);
        assert_eq!(seen_by_alice.followers_count, 1);
        assert_eq!(seen_by_alice.following_count, 0);
        assert!(seen_by_alice.is_following);

        let anonymous = profile(&pool, bob.id, None).await.unwrap().unwrap();
        assert!(!anonymous.is_following);

        assert!(profile(&pool, Uuid::new_v4(), None).await.unwrap().is_none());
    }
}
