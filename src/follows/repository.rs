use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppError,
    follows::{FollowResponse, FollowUserResponse},
    policy,
    toggle::{self, Toggled},
};

const FOLLOW_VIEW: &str = r#"
    SELECT f.id, f.follower_id, u.username, f.following_id AS following, f.created_at
    FROM follows f
    JOIN users u ON u.id = f.follower_id
"#;

/// Follows `target` as `follower` if not yet following, otherwise unfollows.
///
/// Following yourself is refused before anything is written; the `follows_no_self_follow`
/// check constraint backs this up for writes that bypass this function.
pub async fn toggle_follow(
    pool: &PgPool,
    follower: Uuid,
    target: Uuid,
) -> Result<Toggled, AppError> {
    policy::ensure_not_self(follower, target, "follow")?;

    let outcome = toggle::toggle(pool, &toggle::FOLLOWS, follower, target).await?;

    tracing::info!(
        follower_id = %follower,
        following_id = %target,
        following = outcome.is_created(),
        "follow toggled"
    );

    Ok(outcome)
}

pub async fn is_following(pool: &PgPool, follower: Uuid, target: Uuid) -> Result<bool, AppError> {
    let following = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM follows WHERE follower_id = $1 AND following_id = $2)",
    )
    .bind(follower)
    .bind(target)
    .fetch_one(pool)
    .await?;

    Ok(following)
}

pub async fn followers_count(pool: &PgPool, user_id: Uuid) -> Result<i64, AppError> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE following_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    Ok(count)
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<FollowResponse>, AppError> {
    let follow = sqlx::query_as::<_, FollowResponse>(&format!("{} WHERE f.id = $1", FOLLOW_VIEW))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(follow)
}

pub async fn list(
    pool: &PgPool,
    follower: Option<Uuid>,
    following: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Result<Vec<FollowResponse>, AppError> {
    let follows = sqlx::query_as::<_, FollowResponse>(&format!(
        "{} WHERE ($1::uuid IS NULL OR f.follower_id = $1) \
           AND ($2::uuid IS NULL OR f.following_id = $2) \
         ORDER BY f.created_at DESC, f.id DESC LIMIT $3 OFFSET $4",
        FOLLOW_VIEW
    ))
    .bind(follower)
    .bind(following)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(follows)
}

/// Users following `user_id`, most recent first.
pub async fn followers_of(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<FollowUserResponse>, AppError> {
    let users = sqlx::query_as::<_, FollowUserResponse>(
        r#"
        SELECT u.id, u.username, f.created_at AS followed_at
        FROM follows f
        JOIN users u ON f.follower_id = u.id
        WHERE f.following_id = $1
        ORDER BY f.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Users that `user_id` follows, most recent first.
pub async fn following_of(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<FollowUserResponse>, AppError> {
    let users = sqlx::query_as::<_, FollowUserResponse>(
        r#"
        SELECT u.id, u.username, f.created_at AS followed_at
        FROM follows f
        JOIN users u ON f.following_id = u.id
        WHERE f.follower_id = $1
        ORDER BY f.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(users)
}
