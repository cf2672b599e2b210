use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppError,
    likes::LikeResponse,
    toggle::{self, Toggled},
};

const LIKE_VIEW: &str = r#"
    SELECT l.id, l.user_id, u.username, l.post_id AS post, l.created_at
    FROM likes l
    JOIN users u ON u.id = l.user_id
"#;

/// Likes `post_id` as `user_id` if not yet liked, otherwise removes the like.
/// An unknown post surfaces as `NotFound` through the foreign-key rejection.
pub async fn toggle_like(pool: &PgPool, user_id: Uuid, post_id: Uuid) -> Result<Toggled, AppError> {
    let outcome = toggle::toggle(pool, &toggle::LIKES, user_id, post_id).await?;

    tracing::info!(
        user_id = %user_id,
        post_id = %post_id,
        liked = outcome.is_created(),
        "like toggled"
    );

    Ok(outcome)
}

/// Whether `user_id` currently likes `post_id`. Read-only.
pub async fn is_liked_by(pool: &PgPool, post_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
    let liked = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM likes WHERE post_id = $1 AND user_id = $2)",
    )
    .bind(post_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(liked)
}

pub async fn count_for_post(pool: &PgPool, post_id: Uuid) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<LikeResponse>, AppError> {
    let like = sqlx::query_as::<_, LikeResponse>(&format!("{} WHERE l.id = $1", LIKE_VIEW))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(like)
}

pub async fn list(
    pool: &PgPool,
    post: Option<Uuid>,
    user: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Result<Vec<LikeResponse>, AppError> {
    let likes = sqlx::query_as::<_, LikeResponse>(&format!(
        "{} WHERE ($1::uuid IS NULL OR l.post_id = $1) \
           AND ($2::uuid IS NULL OR l.user_id = $2) \
         ORDER BY l.created_at DESC, l.id DESC LIMIT $3 OFFSET $4",
        LIKE_VIEW
    ))
    .bind(post)
    .bind(user)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(likes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{posts, testing};

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    async fn toggling_twice_returns_to_unliked(pool: PgPool) {
        let alice = testing::create_user(&pool, "alice").await;
        let bob = testing::create_user(&pool, "bob").await;
        let post = posts::repository::create(&pool, alice.id, "Hello", "world")
            .await
            .unwrap();

        assert!(!is_liked_by(&pool, post.id, bob.id).await.unwrap());

        assert_eq!(toggle_like(&pool, bob.id, post.id).await.unwrap(), Toggled::Created);
        assert!(is_liked_by(&pool, post.id, bob.id).await.unwrap());
        assert_eq!(count_for_post(&pool, post.id).await.unwrap(), 1);

        assert_eq!(toggle_like(&pool, bob.id, post.id).await.unwrap(), Toggled::Removed);
        assert!(!is_liked_by(&pool, post.id, bob.id).await.unwrap());
        assert_eq!(count_for_post(&pool, post.id).await.unwrap(), 0);
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    async fn likes_are_per_user(pool: PgPool) {
        let alice = testing::create_user(&pool, "alice").await;
        let bob = testing::create_user(&pool, "bob").await;
        let post = posts::repository::create(&pool, alice.id, "", "body")
            .await
            .unwrap();

        toggle_like(&pool, alice.id, post.id).await.unwrap();
        toggle_like(&pool, bob.id, post.id).await.unwrap();
        toggle_like(&pool, alice.id, post.id).await.unwrap();

        assert!(!is_liked_by(&pool, post.id, alice.id).await.unwrap());
        assert!(is_liked_by(&pool, post.id, bob.id).await.unwrap());

        let listed = list(&pool, Some(post.id), None, 10, 0).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].user, "bob");

        let fetched = find(&pool, listed[0].id).await.unwrap().unwrap();
        assert_eq!(fetched.post, post.id);
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    async fn liking_a_missing_post_is_not_found(pool: PgPool) {
        let bob = testing::create_user(&pool, "bob").await;

        let err = toggle_like(&pool, bob.id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)), "got {:?}", err);
        assert_eq!(testing::count(&pool, "likes", "user_id", bob.id).await, 0);
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    async fn storage_rejects_duplicate_likes(pool: PgPool) {
        let alice = testing::create_user(&pool, "alice").await;
        let post = posts::repository::create(&pool, alice.id, "", "body")
            .await
            .unwrap();

        let insert = "INSERT INTO likes (user_id, post_id) VALUES ($1, $2)";
        sqlx::query(insert)
            .bind(alice.id)
            .bind(post.id)
            .execute(&pool)
            .await
            .unwrap();
        let err = sqlx::query(insert)
            .bind(alice.id)
            .bind(post.id)
            .execute(&pool)
            .await
            .unwrap_err();

        assert!(matches!(AppError::from(err), AppError::Conflict(_)));
        assert_eq!(count_for_post(&pool, post.id).await.unwrap(), 1);
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    async fn racing_toggles_never_duplicate(pool: PgPool) {
        let alice = testing::create_user(&pool, "alice").await;
        let bob = testing::create_user(&pool, "bob").await;
        let post = posts::repository::create(&pool, alice.id, "", "body")
            .await
            .unwrap();

        let (first, second) = tokio::join!(
            toggle_like(&pool, bob.id, post.id),
            toggle_like(&pool, bob.id, post.id)
        );
        let outcomes = [first.unwrap(), second.unwrap()];

        // Two toggles serialize into one like and one unlike.
        assert_eq!(
            outcomes.iter().filter(|o| o.is_created()).count(),
            1,
            "outcomes: {:?}",
            outcomes
        );
        assert_eq!(count_for_post(&pool, post.id).await.unwrap(), 0);
    }

    #[sqlx::test(migrator = "crate::db::MIGRATOR")]
    async fn racing_unlikes_settle_on_one_state(pool: PgPool) {
        let alice = testing::create_user(&pool, "alice").await;
        let bob = testing::create_user(&pool, "bob").await;
        let post = posts::repository::create(&pool, alice.id, "", "body")
            .await
            .unwrap();

        for _ in 0..10 {
            if !is_liked_by(&pool, post.id, bob.id).await.unwrap() {
                toggle_like(&pool, bob.id, post.id).await.unwrap();
            }

            let (first, second) = tokio::join!(
                toggle_like(&pool, bob.id, post.id),
                toggle_like(&pool, bob.id, post.id)
            );
            let outcomes = [first.unwrap(), second.unwrap()];

            // Both may report Removed when they race on the same existing row.
            let count = count_for_post(&pool, post.id).await.unwrap();
            assert!(count <= 1, "count {} after {:?}", count, outcomes);
            assert_eq!(
                is_liked_by(&pool, post.id, bob.id).await.unwrap(),
                outcomes.iter().any(|o| o.is_created()),
                "outcomes: {:?}",
                outcomes
            );
        }
    }
}
